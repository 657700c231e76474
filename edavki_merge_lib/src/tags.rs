//! Element names of the KDVP body that the merge reads or writes.

pub const HEADER: &str = "Header";
pub const KDVP_ITEM: &str = "KDVPItem";
pub const SECURITIES: &str = "Securities";
pub const CODE: &str = "Code";
pub const ROW: &str = "Row";
pub const ROW_ID: &str = "ID";
pub const PURCHASE: &str = "Purchase";
pub const SALE: &str = "Sale";
/// Purchase date.
pub const F1: &str = "F1";
/// Purchased quantity.
pub const F3: &str = "F3";
/// Sale date.
pub const F6: &str = "F6";
/// Sold quantity.
pub const F7: &str = "F7";
/// Position held after the row.
pub const F8: &str = "F8";
