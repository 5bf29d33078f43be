//! Server initialization and startup logic for Hookline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hookline_api::lifecycle::{self, CreateSubscriptionRequest};
use hookline_api::{ApiServer, AppState, LeaseRefresher, ProviderCredentials, ServerSettings};
use hookline_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, RuleConfig};
use hookline_core::{EventRule, Matcher, RuleError, TriggerRegistry};
use hookline_protocols::trigger::TriggerProvider;
use hookline_trigger_example::{ExampleSettings, ExampleTriggerProvider};

/// Initialize tracing with console and file output.
///
/// Log files rotate daily under `logging.dir`. `RUST_LOG` overrides
/// `logging.level`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::expand_path(&logging.dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("hookline")
        .filename_suffix("log")
        .max_log_files(logging.max_log_files)
        .build(Path::new(&log_dir))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the process lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Turn configured rules into classifier rules.
pub(crate) fn build_rules(rules: &[RuleConfig]) -> Result<Vec<EventRule>, RuleError> {
    rules
        .iter()
        .map(|rule| {
            Matcher::parse(&rule.match_kind, rule.value.as_deref())
                .map(|matcher| EventRule::new(&rule.event, matcher).on_field(&rule.field))
        })
        .collect()
}

pub(crate) fn example_settings(config: &Config) -> Result<ExampleSettings, RuleError> {
    Ok(
        ExampleSettings::new(&config.provider.name, &config.upstream.base_url)
            .with_author(&config.provider.author)
            .with_timeout(Duration::from_secs(config.upstream.timeout_seconds))
            .with_lease_secs(config.upstream.lease_seconds as i64)
            .with_rules(build_rules(&config.rules)?),
    )
}

/// Run the server in foreground.
pub(crate) async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting Hookline v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("Config: {}", warning);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config: {}", e);
        }
        return Err(format!("invalid configuration ({} errors)", validation.errors.len()).into());
    }

    let provider = Arc::new(ExampleTriggerProvider::new(example_settings(&config)?)?);
    provider
        .constructor()
        .validate_credentials(&config.provider.credentials)
        .await?;
    info!(provider = %config.provider.name, "Provider credentials accepted");

    let registry = Arc::new(TriggerRegistry::new());
    registry.register(provider)?;

    let state = Arc::new(
        AppState::new(registry, config.server.public_url(), &config.provider.name).with_credentials(
            &config.provider.name,
            ProviderCredentials::new(
                config.provider.credentials.clone(),
                config.provider.credential_type,
            ),
        ),
    );

    for sub in &config.subscriptions {
        let request = CreateSubscriptionRequest {
            id: Some(sub.id.clone()),
            provider: None,
            events: sub.events.clone(),
            event_parameters: sub.event_parameters.clone(),
        };
        if let Err(e) = lifecycle::create(&state, request).await {
            error!(subscription_id = %sub.id, error = %e, "Failed to create configured subscription");
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    if config.refresh.enabled {
        let refresher = Arc::new(
            LeaseRefresher::new(state.clone())
                .with_check_interval(Duration::from_secs(config.refresh.check_interval_secs))
                .with_refresh_before(Duration::from_secs(config.refresh.refresh_before_secs)),
        );
        tokio::spawn(refresher.run(shutdown_rx.clone()));
    } else {
        info!("Lease refresher disabled");
    }

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let server = ApiServer::new(
        ServerSettings::new(&config.server.host, config.server.port),
        state.clone(),
    );
    server.run(shutdown_rx).await?;

    // Store is in memory; unregister upstream so nothing outlives the process.
    for stored in state.store.list() {
        match lifecycle::delete(&state, &stored.id).await {
            Ok(result) if result.success => {}
            Ok(result) => warn!(subscription_id = %stored.id, message = %result.message, "Upstream teardown failed"),
            Err(e) => warn!(subscription_id = %stored.id, error = %e, "Upstream teardown failed"),
        }
    }

    info!("Hookline stopped");
    Ok(())
}

/// Validate the configuration and check provider credentials.
pub(crate) async fn validate_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let validation = ConfigValidator::validate(config)?;
    for warning in &validation.warnings {
        println!("warning: {}", warning);
    }
    for e in &validation.errors {
        println!("error: {}", e);
    }
    if !validation.is_valid() {
        return Err(format!("configuration has {} errors", validation.errors.len()).into());
    }

    let provider = ExampleTriggerProvider::new(example_settings(config)?)?;
    match provider
        .constructor()
        .validate_credentials(&config.provider.credentials)
        .await
    {
        Ok(()) => println!("credentials: ok"),
        Err(e) => {
            println!("credentials: {}", e);
            return Err(e.into());
        }
    }

    println!("configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_rules() {
        let config = ConfigLoader::load_str(
            r#"
[[rules]]
event = "issue_opened"
field = "action"
match = "equals"
value = "opened"

[[rules]]
event = "any_push"
match = "exists"
"#,
        )
        .unwrap();

        let rules = build_rules(&config.rules).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules[0].matches(&json!({ "action": "opened" })));
        assert!(!rules[0].matches(&json!({ "type": "opened" })));
        assert!(rules[1].matches(&json!({ "type": "push" })));
    }

    #[test]
    fn test_build_rules_unknown_match() {
        let config = ConfigLoader::load_str(
            r#"
[[rules]]
event = "x"
match = "regex"
value = "a.*"
"#,
        )
        .unwrap();
        assert_eq!(
            build_rules(&config.rules).unwrap_err(),
            RuleError::UnknownMatch("regex".to_string())
        );
    }

    #[test]
    fn test_example_settings_from_config() {
        let config = ConfigLoader::load_str(
            r#"
[provider]
name = "acme"
author = "ops"

[upstream]
base_url = "https://api.acme.test"
timeout_seconds = 5
lease_seconds = 600
"#,
        )
        .unwrap();

        let settings = example_settings(&config).unwrap();
        assert_eq!(settings.name, "acme");
        assert_eq!(settings.author, "ops");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.lease_secs, 600);
        assert!(settings.rules.is_empty());
        assert_eq!(settings.default_event(), "acme_event");
    }

    #[tokio::test]
    async fn test_validate_config_missing_credentials() {
        let config = Config::default();
        assert!(validate_config(&config).await.is_err());
    }
}
