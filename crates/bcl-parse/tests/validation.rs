//! End-to-end validation of parsed documents.

use bcl_parse::parse;
use bcl_tree::{
    Document, ElementType, ReadStatus, ReadValue, Symbol, ValidationErrorKind, Value, ValueError,
};

fn doc(source: &str) -> Document {
    match parse(source.as_bytes(), "test.bcl") {
        Ok(mut doc) => {
            doc.reset_read_status();
            doc
        }
        Err(err) => panic!("parse failed:\n{err}"),
    }
}

fn messages(doc: &Document) -> Vec<String> {
    doc.validation_errors()
        .map(|errors| errors.errors.iter().map(|e| e.message()).collect())
        .unwrap_or_default()
}

#[test]
fn duplicate_blocks_are_rejected() {
    let err = parse(b"a {} a {}", "test.bcl").unwrap_err();
    assert_eq!(
        err.errors[0].message,
        r#"duplicate block "a" (previously declared at line 1)"#
    );

    let doc = doc("a {} a \"x\" {}");
    assert_eq!(doc.elements().len(), 2);
}

#[test]
fn entry_arity() {
    let mut doc = doc("point 1 2\n");
    let point = doc.root.entry("point").unwrap();
    assert!(point.check_nb_values(2));
    assert!(!point.check_nb_values(3));

    assert_eq!(
        messages(&doc),
        vec!["invalid entry: entry has 2 values but should have 3 values"]
    );
}

#[test]
fn integer_range() {
    let err = parse(b"big 9999999999999999999\n", "test.bcl").unwrap_err();
    assert!(err.errors[0].message.contains("out of range"));

    let mut doc = doc("small 300\nlarge 9223372036854775807\n");
    assert_eq!(doc.root.entry("small").unwrap().value::<i8>(), None);
    assert_eq!(
        doc.root.entry("large").unwrap().value::<i64>(),
        Some(i64::MAX)
    );

    let errors = doc.validation_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.errors[0].message(),
        "invalid entry: integer must be between -128 and 127"
    );
    // Located on the value, not the entry
    assert_eq!(errors.errors[0].span.unwrap().to_string(), "1:7-1:9");
}

#[test]
fn boolean_and_null_keywords() {
    let mut doc = doc("flag true\nlimit null\nname null\n");
    assert_eq!(doc.root.entry("flag").unwrap().value::<bool>(), Some(true));
    assert_eq!(
        doc.root.entry("limit").unwrap().value::<Option<u32>>(),
        Some(None)
    );
    assert_eq!(doc.root.entry("name").unwrap().value::<Symbol>(), None);
    assert_eq!(
        messages(&doc),
        vec!["invalid entry: value is null but should be a symbol"]
    );
}

#[test]
fn unknown_element_detection() {
    let mut doc = doc("config {\n  a 1\n  b 2\n  c 3\n}\n");
    let config = doc.root.block("config").unwrap();
    config.entry("a");
    config.entry("b");

    let statuses: Vec<(String, ReadStatus)> = doc.elements()[0]
        .children()
        .iter()
        .map(|e| (e.name().to_string(), e.read_status()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a".to_string(), ReadStatus::Read),
            ("b".to_string(), ReadStatus::Read),
            ("c".to_string(), ReadStatus::Unread),
        ]
    );

    assert_eq!(doc.check_unread_elements(), 1);
    let errors = doc.validation_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].message(), r#"unknown entry "c""#);
    assert_eq!(errors.errors[0].element_type, None);
    assert_eq!(errors.errors[0].span.unwrap().to_string(), "4:3-4:5");
}

#[test]
fn ignored_elements_are_reported() {
    let mut doc = doc("listener \"a\" {}\nlistener \"b\" {}\n");
    let listener = doc.root.block("listener").unwrap();
    assert_eq!(listener.block_name(), Some("a"));

    let statuses: Vec<ReadStatus> = doc.elements().iter().map(|e| e.read_status()).collect();
    assert_eq!(statuses, vec![ReadStatus::Read, ReadStatus::Ignored]);

    assert_eq!(doc.check_unread_elements(), 1);
    let errors = doc.validation_errors().unwrap();
    assert_eq!(messages(&doc), vec![r#"duplicate block "listener" ignored"#]);
    assert_eq!(errors.errors[0].element_type, None);
    assert_eq!(errors.errors[0].span.unwrap().start.line, 2);

    // A multi-result lookup reads every match
    doc.reset_read_status();
    assert_eq!(doc.root.blocks("listener").len(), 2);
    assert_eq!(doc.check_unread_elements(), 0);
    assert!(doc.validation_errors().is_none());
}

#[test]
fn conflict_check() {
    let mut doc = doc("x 1\ny 2\n");
    assert_eq!(doc.root.check_exactly_one_of(&["x", "y"]), None);
    assert_eq!(
        doc.root.validation_errors(),
        &[ValidationErrorKind::ElementConflict {
            names: vec!["x".to_string(), "y".to_string()]
        }]
    );
    assert_eq!(messages(&doc), vec![r#"conflicting child elements "x" and "y""#]);
}

#[test]
fn element_type_mismatch() {
    let mut doc = doc("server 1\n");
    assert!(doc.root.block("server").is_none());
    assert!(doc.root.maybe_entry("server").unwrap().block("tls").is_none());

    assert_eq!(
        messages(&doc),
        vec![
            r#"missing child block "server""#,
            "invalid entry: element should be a block",
        ]
    );
}

#[derive(Debug, PartialEq)]
enum Level {
    Debug,
    Info,
    Error,
}

impl ReadValue for Level {
    fn read_value(value: &Value) -> Result<Self, ValueError> {
        value.check_one_of(&["debug".into(), "info".into(), "error".into()])?;
        match value.extract::<String>()?.as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            _ => Ok(Level::Error),
        }
    }
}

#[test]
fn full_validation_pass() {
    let source = r#"
log {
  level info
  outputs "stdout" "syslog"
}

server "main" {
  listen "0.0.0.0" 8080
  workers 0
  timeout 2.5
  pattern "^/api/"
}

server "admin" {
  listen "127.0.0.1" 70000
  color blue
}
"#;
    let mut doc = doc(source);

    if let Some(log) = doc.root.block("log") {
        let level = log.entry("level").and_then(|e| e.value::<Level>());
        assert_eq!(level, Some(Level::Info));
        let outputs = log.entry("outputs").and_then(|e| e.values::<Vec<String>>());
        assert_eq!(
            outputs,
            Some(vec!["stdout".to_string(), "syslog".to_string()])
        );
    }

    for server in doc.root.blocks("server") {
        let name = server.block_name().map(str::to_string);
        let listen = server
            .entry("listen")
            .and_then(|e| e.values::<(String, u16)>());
        let workers = server.maybe_entry("workers").and_then(|e| {
            e.value_with::<u32, _>(|n| {
                if *n >= 1 {
                    Ok(())
                } else {
                    Err(ValueError::MinInteger { min: 1 })
                }
            })
        });
        let timeout = server.maybe_entry("timeout").and_then(|e| e.value::<f64>());
        let pattern = server
            .maybe_entry("pattern")
            .and_then(|e| e.value::<regex::Regex>());

        if name.as_deref() == Some("main") {
            assert_eq!(listen, Some(("0.0.0.0".to_string(), 8080)));
            assert_eq!(workers, None);
            assert_eq!(timeout, Some(2.5));
            assert!(pattern.is_some_and(|re| re.is_match("/api/users")));
        }
    }

    assert_eq!(doc.check_unread_elements(), 1);

    let errors = doc.validation_errors().unwrap();
    let messages: Vec<String> = errors.errors.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec![
            "invalid entry: integer must be greater or equal to 1",
            "invalid entry: integer must be between 0 and 65535",
            r#"unknown entry "color""#,
        ]
    );

    let kinds: Vec<Option<ElementType>> = errors.errors.iter().map(|e| e.element_type).collect();
    assert_eq!(
        kinds,
        vec![Some(ElementType::Entry), Some(ElementType::Entry), None]
    );

    let rendered = errors.render_with_context(0);
    assert!(rendered.contains("      9 |   workers 0\n        |           ^"));
}
