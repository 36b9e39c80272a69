//! Application-level configuration loading: storage location, game rules, auth and alerting.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FACE_MATCH_CONFIG_PATH";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const ALERT_WEBHOOK_ENV: &str = "ALERT_WEBHOOK_URL";
/// Smallest choice set that still leaves one distractor.
const MIN_CHOICE_COUNT: usize = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// sqlx connection string of the photo database.
    pub database_url: String,
    /// TCP port the HTTP server binds to.
    pub port: u16,
    /// Round policy.
    pub rules: GameRules,
    /// Sign-in contract.
    pub auth: AuthConfig,
    /// Low-score alert settings.
    pub alert: AlertConfig,
    /// Session lifetime.
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Policy constants of a quiz round.
pub struct GameRules {
    /// Pictures shown per question; also the minimum album size.
    pub choice_count: usize,
    /// Answers needed before a round can finish.
    pub round_length: u32,
    /// Final percentages strictly below this value trigger an alert.
    pub low_score_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Contract with the upstream sign-in layer.
pub struct AuthConfig {
    /// Header carrying the numeric id of the authenticated player.
    pub user_header: String,
    /// Where unauthenticated players are sent.
    pub signin_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Low-score alert settings.
pub struct AlertConfig {
    /// Recipient key understood by the mail relay (e.g. the family contact).
    pub recipient: String,
    /// Subject line of the alert.
    pub subject: String,
    /// Plain-text body of the alert.
    pub body: String,
    /// Mail relay endpoint; alerts are only logged when unset.
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Lifetime of per-player sessions.
pub struct SessionConfig {
    /// Seconds without a request before a session is evicted.
    pub idle_timeout_secs: u64,
    /// Seconds between two eviction passes.
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides()
    }

    /// Parse a JSON document; missing sections keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(contents)?;
        Ok(config.sanitized())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        if let Some(port) = non_empty_env("PORT")
            .or_else(|| non_empty_env("SERVER_PORT"))
            .and_then(|value| value.parse::<u16>().ok())
        {
            self.port = port;
        }
        if let Some(url) = non_empty_env(ALERT_WEBHOOK_ENV) {
            self.alert.webhook_url = Some(url);
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.rules.choice_count < MIN_CHOICE_COUNT {
            warn!(
                configured = self.rules.choice_count,
                "choice_count too small; using {MIN_CHOICE_COUNT}"
            );
            self.rules.choice_count = MIN_CHOICE_COUNT;
        }
        if self.alert.webhook_url.as_deref().is_some_and(str::is_empty) {
            self.alert.webhook_url = None;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://face-match.db?mode=rwc".into(),
            port: 3001,
            rules: GameRules::default(),
            auth: AuthConfig::default(),
            alert: AlertConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            choice_count: 4,
            round_length: 4,
            low_score_threshold: 50.0,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-user-id".into(),
            signin_path: "/signin".into(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            recipient: "familyEmail".into(),
            subject: "Alert: Low Score in Face Match Game".into(),
            body: "The user scored below 50% in the face match game. Please check in with them."
                .into(),
            webhook_url: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 30 * 60,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    /// Idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Sweep interval as a [`Duration`], never zero.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
