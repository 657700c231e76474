use edavki_xml::{Document, Error, NamespaceBindings};

const KDVP_NS: &str = "http://edavki.durs.si/Documents/Schemas/Doh_KDVP_9.xsd";
const EDP_NS: &str = "http://edavki.durs.si/Documents/Schemas/EDP-Common-1.xsd";

fn report_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Envelope xmlns="{KDVP_NS}" xmlns:edp="{EDP_NS}">
  <edp:Header>
    <edp:taxpayer><edp:taxNumber>12345678</edp:taxNumber></edp:taxpayer>
  </edp:Header>
  <body>
    <Doh_KDVP>
      <KDVPItem>
        <Securities>
          <Code>AAPL</Code>
          <Row><ID>0</ID><Purchase><F1>2023-01-10</F1><F3>10</F3></Purchase><F8>10.00000000</F8></Row>
        </Securities>
      </KDVPItem>
    </Doh_KDVP>
  </body>
</Envelope>"#
    )
}

fn bindings() -> NamespaceBindings {
    NamespaceBindings::new()
        .with_default(KDVP_NS)
        .with_prefix("edp", EDP_NS)
}

#[test]
fn test_written_document_parses_back_to_the_same_tree() {
    let doc = Document::parse_str(&report_xml()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merged.xml");

    doc.write_to_file(&path, &bindings()).unwrap();
    let reread = Document::from_file(&path).unwrap();

    assert_eq!(reread, doc);
}

#[test]
fn test_write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merged.xml");
    std::fs::write(&path, "stale content that is much longer than nothing at all").unwrap();

    let doc = Document::parse_str("<Envelope/>").unwrap();
    doc.write_to_file(&path, &NamespaceBindings::new()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("stale"));
    assert!(written.ends_with("<Envelope/>"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.xml");
    let err = Document::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
    assert!(err.to_string().contains("does-not-exist.xml"));
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("merged.xml");
    let doc = Document::parse_str("<Envelope/>").unwrap();
    let err = doc.write_to_file(&path, &bindings()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}
