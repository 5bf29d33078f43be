use super::*;
use hookline_protocols::types::CredentialType;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.logging.level, "info");
    assert_eq!(
        std::path::PathBuf::from(&config.logging.dir),
        hookline_dir().join("logs")
    );
    assert!(config.rules.is_empty());
    assert!(config.subscriptions.is_empty());
}

#[test]
fn test_server_public_url_default() {
    let server = ServerConfig::default();
    assert_eq!(server.public_url(), "http://127.0.0.1:8080");
    assert_eq!(
        server.endpoint_for("abc"),
        "http://127.0.0.1:8080/triggers/abc"
    );
}

#[test]
fn test_server_public_url_trailing_slash() {
    let server = ServerConfig {
        public_url: Some("https://hooks.example.com/".to_string()),
        ..Default::default()
    };
    assert_eq!(server.endpoint_for("x"), "https://hooks.example.com/triggers/x");
}

#[test]
fn test_provider_config_default() {
    let provider = ProviderConfig::default();
    assert_eq!(provider.name, "example");
    assert_eq!(provider.credential_type, CredentialType::ApiKey);
    assert!(provider.credentials.is_empty());
}

#[test]
fn test_upstream_config_default() {
    let upstream = UpstreamConfig::default();
    assert_eq!(upstream.timeout_seconds, 30);
    assert_eq!(upstream.lease_seconds, 604_800);
}

#[test]
fn test_refresh_config_default() {
    let refresh = RefreshConfig::default();
    assert!(refresh.enabled);
    assert_eq!(refresh.check_interval_secs, 60);
    assert_eq!(refresh.refresh_before_secs, 3600);
}

#[test]
fn test_rule_config_defaults() {
    let rule: RuleConfig = toml::from_str("event = \"e\"\nvalue = \"v\"").unwrap();
    assert_eq!(rule.field, "type");
    assert_eq!(rule.match_kind, "prefix");
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("127.0.0.1"));
    assert!(json.contains("\"credential_type\":\"api-key\""));
}

#[test]
fn test_hookline_dir_under_home() {
    let dir = hookline_dir();
    assert!(dir.ends_with(".hookline"));
    if let Some(home) = dirs::home_dir() {
        assert!(dir.starts_with(home));
    }
}
