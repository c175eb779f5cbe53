//! TLS trust sourcing tests
//!
//! Exercises both sourcing paths with generated self-signed material: three
//! local PEM files and a mocked secret store.

use std::fs;
use std::path::Path;

use mockall::mock;
use mockall::predicate::eq;
use openssl::asn1::Asn1Time;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::{X509NameBuilder, X509};

use secure_appconfig::common::{ConfigError, Result};
use secure_appconfig::config::load_from_reader;
use secure_appconfig::kafka::{build_kafka_config, ProducerTuning};
use secure_appconfig::tls::{
    SecretData, SecretStore, TlsTrust, SECRET_CA_KEY, SECRET_CERT_KEY, SECRET_KEY_KEY,
};

mock! {
    Store {}

    impl SecretStore for Store {
        fn fetch(&self, namespace: &str, name: &str) -> Result<SecretData>;
    }
}

fn self_signed(cn: &str) -> (X509, PKey<Private>) {
    let rsa = Rsa::generate(2048).unwrap();
    let key = PKey::from_rsa(rsa).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(30).unwrap())
        .unwrap();
    builder.sign(&key, MessageDigest::sha256()).unwrap();

    (builder.build(), key)
}

fn write_material(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let (cert, key) = self_signed("client");
    let (ca, _) = self_signed("test-ca");

    let cert_path = dir.join("cert.pem");
    let key_path = dir.join("key.pem");
    let ca_path = dir.join("ca.pem");

    fs::write(&cert_path, cert.to_pem().unwrap()).unwrap();
    fs::write(&key_path, key.private_key_to_pem_pkcs8().unwrap()).unwrap();
    fs::write(&ca_path, ca.to_pem().unwrap()).unwrap();

    (cert_path, key_path, ca_path)
}

fn secret_data() -> SecretData {
    let (cert, key) = self_signed("client");
    let (ca, _) = self_signed("test-ca");

    let mut data = SecretData::new();
    data.insert(SECRET_CERT_KEY.to_string(), cert.to_pem().unwrap());
    data.insert(
        SECRET_KEY_KEY.to_string(),
        key.private_key_to_pem_pkcs8().unwrap(),
    );
    data.insert(SECRET_CA_KEY.to_string(), ca.to_pem().unwrap());
    data
}

#[test]
fn loads_material_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let (cert, key, ca) = write_material(dir.path());

    let trust = TlsTrust::from_files(&cert, &key, &ca, false).unwrap();
    assert_eq!(trust.ca_certs.len(), 1);
    assert!(!trust.insecure_skip_verify);
    trust.ca_store().unwrap();
}

#[test]
fn trust_debug_output_omits_key_material() {
    let dir = tempfile::tempdir().unwrap();
    let (cert, key, ca) = write_material(dir.path());

    let trust = TlsTrust::from_files(&cert, &key, &ca, false).unwrap();
    let rendered = format!("{:?}", trust);
    assert!(rendered.contains("TlsTrust"));
    assert!(!rendered.contains("PRIVATE KEY"));
}

#[test]
fn loads_material_from_secret_store() {
    let mut store = MockStore::new();
    store
        .expect_fetch()
        .with(eq("prod"), eq("kafka-tls"))
        .times(1)
        .returning(|_, _| Ok(secret_data()));

    let trust = TlsTrust::from_secret_store(&store, "prod", "kafka-tls", true).unwrap();
    assert!(trust.insecure_skip_verify);
    assert_eq!(trust.ca_certs.len(), 1);
}

#[test]
fn secret_missing_entry_is_fetch_error() {
    let mut store = MockStore::new();
    store.expect_fetch().returning(|_, _| {
        let mut data = secret_data();
        data.remove(SECRET_KEY_KEY);
        Ok(data)
    });

    let err = TlsTrust::from_secret_store(&store, "prod", "kafka-tls", false).unwrap_err();
    match err {
        ConfigError::SecretFetch { message, .. } => assert!(message.contains(SECRET_KEY_KEY)),
        other => panic!("expected secret fetch error, got {other}"),
    }
}

#[test]
fn failed_fetch_is_reported_then_fails() {
    let mut store = MockStore::new();
    store.expect_fetch().returning(|namespace, name| {
        Err(ConfigError::SecretFetch {
            namespace: namespace.to_string(),
            name: name.to_string(),
            message: "not found".to_string(),
        })
    });

    // existing behavior: the path proceeds with empty data and fails there
    let err = TlsTrust::from_secret_store(&store, "prod", "missing", false).unwrap_err();
    assert!(matches!(err, ConfigError::SecretFetch { .. }));
}

const TLS_DOC: &str = r#"
name: orders-service
spec:
  secondary_ports:
    kafka:
      options:
        topic: orders
      matched_primary_port:
        application_name: kafka-broker
        location:
          address: "a:9092"
          port: 9092
"#;

#[test]
fn builder_sources_tls_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let (cert, key, ca) = write_material(dir.path());
    let app = load_from_reader(TLS_DOC.as_bytes(), &[]).unwrap();

    let mut tuning = ProducerTuning {
        net_tls_enable: true,
        cert_file: cert,
        key_file: key,
        ca_file: ca,
        ..Default::default()
    };
    tuning.complete();

    let client = build_kafka_config("kafka", &app, &tuning, None).unwrap();
    assert!(client.tls.is_some());
}

#[test]
fn builder_sources_tls_from_secret_store() {
    let app = load_from_reader(TLS_DOC.as_bytes(), &[]).unwrap();

    let mut store = MockStore::new();
    store
        .expect_fetch()
        .with(eq("prod"), eq("kafka-tls"))
        .returning(|_, _| Ok(secret_data()));

    let mut tuning = ProducerTuning {
        net_tls_enable: true,
        secret_namespace: "prod".to_string(),
        secret_name: "kafka-tls".to_string(),
        ..Default::default()
    };
    tuning.complete();

    let client = build_kafka_config("kafka", &app, &tuning, Some(&store)).unwrap();
    assert!(client.tls.is_some());
}

#[test]
fn builder_without_store_fails_when_secret_named() {
    let app = load_from_reader(TLS_DOC.as_bytes(), &[]).unwrap();

    let mut tuning = ProducerTuning {
        net_tls_enable: true,
        secret_namespace: "prod".to_string(),
        secret_name: "kafka-tls".to_string(),
        ..Default::default()
    };
    tuning.complete();

    let err = build_kafka_config("kafka", &app, &tuning, None).unwrap_err();
    assert!(matches!(err, ConfigError::SecretFetch { .. }));
}
