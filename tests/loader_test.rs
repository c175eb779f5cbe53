//! Load pipeline tests
//!
//! End-to-end coverage of the loader: preprocessor pipeline, decryption of
//! embedded tokens, parse failures, and the copy-on-read discipline of the
//! resolved model.

use std::fs;

use secure_appconfig::common::ConfigError;
use secure_appconfig::config::{load_from_file, load_from_reader, EncryptorSection};
use secure_appconfig::crypto::{pbe, PbeDecryptor, Preprocess};

fn document_with(db_password_token: &str) -> String {
    format!(
        r#"
kind: Application
api_version: v1
name: orders-service
namespace: prod
spec:
  primary_ports:
    http:
      interface:
        name: rest
      location:
        address: 0.0.0.0
        port: 8080
  secondary_ports:
    kafka:
      interface:
        name: messaging
      options:
        topic: orders
        consumer_group: orders-workers
      matched_primary_port:
        application_name: kafka-broker
        location:
          address: "a:9092,b:9092"
          port: 9092
  custom_config:
    database:
      password: ENC({db_password_token})
"#
    )
}

fn decrypting_pipeline(password: &str) -> Vec<Box<dyn Preprocess>> {
    let mut encryptor = EncryptorSection {
        password: password.to_string(),
        ..Default::default()
    };
    encryptor.complete();
    vec![Box::new(PbeDecryptor::from_section(&encryptor))]
}

#[test]
fn decrypts_embedded_token_before_parsing() {
    let token = pbe::encrypt("hunter2", "master").unwrap();
    let doc = document_with(&token);

    let app = load_from_reader(doc.as_bytes(), &decrypting_pipeline("master")).unwrap();

    let database = app.custom_config().get_string_map("database");
    assert_eq!(
        database.get("password").and_then(|v| v.as_str()),
        Some("hunter2"),
        "plaintext must not retain the ENC(...) wrapper"
    );
}

#[test]
fn loads_from_file_with_pipeline() {
    let token = pbe::encrypt("hunter2", "master").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, document_with(&token)).unwrap();

    let app = load_from_file(&path, &decrypting_pipeline("master")).unwrap();
    assert_eq!(app.name(), "orders-service");
    assert_eq!(app.namespace(), "prod");
    assert_eq!(app.kind(), "Application");
}

#[test]
fn zero_token_document_loads_unchanged() {
    let doc = document_with("ignored").replace("password: ENC(ignored)", "password: plain");

    let app = load_from_reader(doc.as_bytes(), &decrypting_pipeline("master")).unwrap();
    let database = app.custom_config().get_string_map("database");
    assert_eq!(
        database.get("password").and_then(|v| v.as_str()),
        Some("plain")
    );
}

#[test]
fn wrong_password_aborts_whole_load() {
    let token = pbe::encrypt("hunter2", "master").unwrap();
    let doc = document_with(&token);

    let err = load_from_reader(doc.as_bytes(), &decrypting_pipeline("not-master")).unwrap_err();
    match err {
        ConfigError::Preprocess { stage, .. } => assert_eq!(stage, "pbe_with_md5_and_des"),
        other => panic!("expected preprocess error, got {other}"),
    }
}

#[test]
fn valid_and_invalid_tokens_still_abort() {
    let good = pbe::encrypt("ok", "master").unwrap();
    let doc = format!(
        "name: demo\nspec:\n  custom_config:\n    a: ENC({good})\n    b: ENC(!!broken!!)\n"
    );

    assert!(load_from_reader(doc.as_bytes(), &decrypting_pipeline("master")).is_err());
}

#[test]
fn secondary_port_lookup_is_copy_on_read() {
    let token = pbe::encrypt("x", "master").unwrap();
    let app =
        load_from_reader(document_with(&token).as_bytes(), &decrypting_pipeline("master")).unwrap();

    let mut first = app.secondary_port("kafka").unwrap();
    first.matched_primary_port = None;

    let second = app.secondary_port("kafka").unwrap();
    assert!(
        second.matched_primary_port.is_some(),
        "mutating a returned copy must not affect the stored spec"
    );
}

#[test]
fn unknown_secondary_port_is_none() {
    let app = load_from_reader(
        "name: demo\nspec: {}\n".as_bytes(),
        &[],
    )
    .unwrap();

    assert!(app.secondary_port("kafka").is_none());
    assert!(app.matched_primary_port("kafka").is_none());
    assert!(app.matched_primary_port_location("kafka").is_none());
}

#[test]
fn json_document_is_accepted() {
    // YAML is a superset of JSON
    let doc = r#"{"kind": "Application", "name": "demo", "spec": {"custom_config": {"k": "v"}}}"#;
    let app = load_from_reader(doc.as_bytes(), &[]).unwrap();
    assert_eq!(app.name(), "demo");
    assert_eq!(app.custom_config().get_string("k"), "v");
}

#[test]
fn malformed_document_is_parse_error() {
    let err = load_from_reader("spec: [broken".as_bytes(), &[]).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
