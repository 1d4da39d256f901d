use crate::conf::{ConfigError, ValidationError, parse_config};
use pretty_assertions::assert_eq;
use std::path::Path;

fn errors_for(toml: &str) -> Vec<ValidationError> {
    match parse_config(toml, Path::new("edge.toml")) {
        Err(err @ ConfigError::Validation { .. }) => err.validation_errors().to_vec(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn reports_all_errors_at_once() {
    let errors = errors_for(
        r#"
        [server]
        listen = "not-an-address"
        threads = 0

        [origin]
        kind = "upstream"
        host = ""
        port = 0
        "#,
    );

    assert_eq!(
        errors,
        vec![
            ValidationError::InvalidListen {
                listen: "not-an-address".to_string()
            },
            ValidationError::ZeroThreads,
            ValidationError::EmptyUpstreamHost,
            ValidationError::ZeroUpstreamPort,
        ]
    );
}

#[test]
fn static_root_must_exist() {
    let errors = errors_for(
        r#"
        [server]
        listen = "127.0.0.1:8080"

        [origin]
        kind = "static"
        root = "/definitely/not/a/real/dir"
        "#,
    );

    assert_eq!(
        errors,
        vec![ValidationError::MissingRoot {
            root: "/definitely/not/a/real/dir".into()
        }]
    );
}

#[test]
fn device_names_must_be_unique() {
    let errors = errors_for(
        r#"
        [server]
        listen = "127.0.0.1:8080"

        [origin]
        kind = "upstream"
        host = "origin.internal"

        [[devices]]
        name = "edge"
        builtin = "precompressed_rewrite"

        [[devices]]
        name = "edge"
        builtin = "structured_logging"
        "#,
    );

    assert_eq!(
        errors,
        vec![ValidationError::DuplicateDevice {
            name: "edge".to_string()
        }]
    );
}

#[test]
fn default_document_must_be_a_file_name() {
    for document in ["", "pages/index.html"] {
        let errors = errors_for(&format!(
            r#"
            [server]
            listen = "127.0.0.1:8080"

            [origin]
            kind = "upstream"
            host = "origin.internal"

            [[devices]]
            name = "rewrite"
            builtin = "precompressed_rewrite"
            default_document = "{document}"
            "#
        ));

        assert_eq!(
            errors,
            vec![ValidationError::InvalidDefaultDocument {
                name: "rewrite".to_string(),
                document: document.to_string(),
            }]
        );
    }
}

#[test]
fn unknown_device_option_is_rejected() {
    let errors = errors_for(
        r#"
        [server]
        listen = "127.0.0.1:8080"

        [origin]
        kind = "upstream"
        host = "origin.internal"

        [[devices]]
        name = "access"
        builtin = "structured_logging"
        include_identity = true
        "#,
    );

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ValidationError::InvalidDeviceOptions { name, .. } if name == "access"
    ));
}
