#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_TIMEOUT;
use crate::domain::model::WebhookTarget;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{self, Validate};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Where and how leads are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    pub target: WebhookTarget,
    pub request_timeout: Duration,
}

impl WebhookSettings {
    /// A URL is required unless `demo_mode` is set. `demo_mode` wins when both are given.
    pub fn resolve(url: Option<&str>, demo_mode: bool, timeout_secs: Option<u64>) -> Result<Self> {
        let request_timeout = match timeout_secs {
            Some(secs) => {
                validation::validate_range("webhook.timeout_seconds", secs, 1, 300)?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let target = match (url, demo_mode) {
            (url, true) => {
                if url.is_some() {
                    tracing::warn!("Demo mode enabled, ignoring configured webhook URL");
                }
                WebhookTarget::Demo
            }
            (Some(url), false) => WebhookTarget::Live(validation::validate_url("webhook.url", url)?),
            (None, false) => {
                return Err(LeadError::MissingConfigError {
                    field: "webhook.url".to_string(),
                })
            }
        };

        Ok(Self {
            target,
            request_timeout,
        })
    }
}

impl ConfigProvider for WebhookSettings {
    fn webhook_target(&self) -> &WebhookTarget {
        &self.target
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Values given on the command line or environment. They take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub webhook_url: Option<String>,
    pub demo_mode: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub json_logs: bool,
}

/// Fully resolved relay configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub webhook: WebhookSettings,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(file: Option<TomlConfig>, overrides: SettingsOverrides) -> Result<Self> {
        let mut file = file.unwrap_or_default();
        // Only the URL that ends up in use is validated.
        if overrides.webhook_url.is_some() || overrides.demo_mode || file.demo_mode() {
            file.webhook.url = None;
        }
        file.validate()?;

        let url = overrides.webhook_url.or(file.webhook.url.clone());
        let webhook = WebhookSettings::resolve(
            url.as_deref(),
            overrides.demo_mode || file.demo_mode(),
            overrides
                .request_timeout_secs
                .or(file.webhook.timeout_seconds),
        )?;

        let settings = Self {
            host: overrides
                .host
                .or(file.server.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            static_dir: overrides
                .static_dir
                .or(file.server.static_dir.clone())
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            webhook,
            json_logs: overrides.json_logs || file.json_logs(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|e| LeadError::InvalidConfigValueError {
                field: "server.host".to_string(),
                value: self.host.clone(),
                reason: format!("Not an IP address: {}", e),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_path("server.static_dir", &self.static_dir)?;
        self.bind_addr()?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn webhook_target(&self) -> &WebhookTarget {
        &self.webhook.target
    }

    fn request_timeout(&self) -> Duration {
        self.webhook.request_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides_with_url(url: &str) -> SettingsOverrides {
        SettingsOverrides {
            webhook_url: Some(url.to_string()),
            ..SettingsOverrides::default()
        }
    }

    #[test]
    fn test_defaults_with_url() {
        let settings =
            Settings::resolve(None, overrides_with_url("https://hooks.example.com/a")).unwrap();

        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.static_dir, DEFAULT_STATIC_DIR);
        assert_eq!(settings.request_timeout(), DEFAULT_TIMEOUT);
        assert!(!settings.webhook_target().is_demo());
        assert_eq!(settings.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_missing_url_fails_fast() {
        let err = Settings::resolve(None, SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, LeadError::MissingConfigError { .. }));
    }

    #[test]
    fn test_placeholder_url_is_not_demo_mode() {
        let err = Settings::resolve(None, overrides_with_url("YOUR_WEBHOOK_URL_HERE")).unwrap_err();
        assert!(matches!(err, LeadError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_explicit_demo_mode() {
        let settings = Settings::resolve(
            None,
            SettingsOverrides {
                demo_mode: true,
                ..SettingsOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(settings.webhook.target, WebhookTarget::Demo);
    }

    #[test]
    fn test_overrides_take_precedence_over_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[server]
port = 8080
static_dir = "./public"

[webhook]
url = "https://file.example.com/hook"
timeout_seconds = 20
"#,
        )
        .unwrap();

        let settings = Settings::resolve(
            Some(file),
            SettingsOverrides {
                webhook_url: Some("https://cli.example.com/hook".to_string()),
                port: Some(9000),
                ..SettingsOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.static_dir, "./public");
        assert_eq!(settings.request_timeout(), Duration::from_secs(20));
        match settings.webhook_target() {
            WebhookTarget::Live(url) => assert_eq!(url.host_str(), Some("cli.example.com")),
            other => panic!("expected live target, got {:?}", other),
        }
    }

    #[test]
    fn test_ipv6_host_binds() {
        let settings = Settings::resolve(
            None,
            SettingsOverrides {
                host: Some("::".to_string()),
                port: Some(8080),
                demo_mode: true,
                ..SettingsOverrides::default()
            },
        )
        .unwrap();

        let addr = settings.bind_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_cli_url_bypasses_unresolved_file_url() {
        let file = TomlConfig::from_toml_str(
            r#"
[webhook]
url = "${LEAD_RELAY_TEST_UNSET_WEBHOOK}"
"#,
        )
        .unwrap();

        let settings = Settings::resolve(
            Some(file.clone()),
            overrides_with_url("https://cli.example.com/hook"),
        )
        .unwrap();
        assert!(!settings.webhook_target().is_demo());

        let err = Settings::resolve(Some(file), SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, LeadError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_bad_host_rejected() {
        let err = Settings::resolve(
            None,
            SettingsOverrides {
                host: Some("not a host".to_string()),
                demo_mode: true,
                ..SettingsOverrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LeadError::InvalidConfigValueError { .. }));
    }
}
