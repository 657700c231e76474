//! Merges two broker KDVP tax reports into a single eDavki submission.
//!
//! The primary report (eToro) is the output skeleton. Securities from the secondary report are
//! matched by instrument code and their rows are interleaved into the primary timeline, with the
//! row sequence (`ID`) and running position (`F8`) recomputed.

pub mod config;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod namespace;
pub mod report;
pub mod rows;
pub mod tags;

pub use edavki_xml;
pub use edavki_xml::{Document, NamespaceBindings};

pub use config::MergeConfig;
pub use error::{MergeError, RowError};
pub use matcher::{MatchReport, SecurityIndex};
pub use merge::{merge_documents, MergeOutcome, SecurityMerge};
pub use report::{write_outputs, OutputPaths};
