use std::path::PathBuf;

use crate::*;

#[test]
fn test_inno_error_display() {
    let not_found = InnoError::NotFound {
        path: PathBuf::from("/workspace/models/inno"),
    };
    assert_eq!(not_found.to_string(), "Models folder not found.");

    let status_error = InnoError::unexpected_status("http://127.0.0.1:11434/", 503);
    assert_eq!(
        status_error.to_string(),
        "Connect to model server failed: Error: Received status code 503 from http://127.0.0.1:11434/"
    );

    let transport_error = InnoError::transport("http://127.0.0.1:1/", "connection refused");
    assert_eq!(
        transport_error.to_string(),
        "Connect to model server failed: Connection failed to http://127.0.0.1:1/: connection refused"
    );

    assert_eq!(
        InnoError::DispatcherClosed.to_string(),
        "后台执行器已关闭，拒绝提交新任务"
    );
    assert_eq!(
        InnoError::config_error("bad port").to_string(),
        "配置错误: bad port"
    );
    assert_eq!(InnoError::internal("boom").to_string(), "内部错误: boom");
}

#[test]
fn test_creation_methods() {
    let error = InnoError::not_found("/tmp/missing");
    assert!(matches!(error, InnoError::NotFound { ref path } if path == &PathBuf::from("/tmp/missing")));

    let error = InnoError::unexpected_status("http://h:1/", 404);
    assert_eq!(error.probe_error().and_then(ProbeError::status), Some(404));

    let error = InnoError::transport("http://h:1/", "timed out");
    assert_eq!(error.probe_error().map(ProbeError::url), Some("http://h:1/"));
    assert_eq!(error.probe_error().and_then(ProbeError::status), None);
}

#[test]
fn test_is_connection_error() {
    assert!(InnoError::unexpected_status("http://h:1/", 500).is_connection_error());
    assert!(InnoError::transport("http://h:1/", "dns").is_connection_error());
    assert!(!InnoError::not_found("/x").is_connection_error());
    assert!(!InnoError::DispatcherClosed.is_connection_error());
}

#[test]
fn test_is_fatal() {
    assert!(InnoError::not_found("/x").is_fatal());
    assert!(InnoError::transport("http://h:1/", "refused").is_fatal());
    assert!(InnoError::config_error("bad").is_fatal());
    assert!(!InnoError::DispatcherClosed.is_fatal());
}

#[test]
fn test_conversions() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "spawn failed");
    let error: InnoError = io_error.into();
    assert!(matches!(error, InnoError::Internal(ref msg) if msg.contains("spawn failed")));

    let error: InnoError = anyhow::anyhow!("wrapped").into();
    assert!(matches!(error, InnoError::Internal(ref msg) if msg == "wrapped"));

    let error: InnoError = config::ConfigError::Message("bad key".to_string()).into();
    assert!(matches!(error, InnoError::Configuration(ref msg) if msg.contains("bad key")));

    let probe = ProbeError::UnexpectedStatus {
        url: "http://h:1/".to_string(),
        status: 502,
    };
    let error: InnoError = probe.clone().into();
    assert_eq!(error.probe_error(), Some(&probe));
}
