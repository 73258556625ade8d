use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub announcements: AnnouncementConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_duration_hours: i64,
}

/// Controls which parts of a user the eligibility rules may look at.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnnouncementConfig {
    /// User attributes exposed to eligibility conditions. Empty exposes all of them.
    #[serde(default)]
    pub user_fields: Vec<String>,
    /// Named zero-argument predicates (e.g. `free?`) added to the user snapshot.
    #[serde(default)]
    pub user_predicates: Vec<String>,
    #[serde(default = "default_recent_window_days")]
    pub recent_window_days: i64,
}

fn default_recent_window_days() -> i64 {
    14
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            user_fields: Vec::new(),
            user_predicates: Vec::new(),
            recent_window_days: default_recent_window_days(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://bulletin.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("announcements.recent_window_days", 14)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with BULLETIN__ prefix, double underscore separates levels)
            .add_source(
                Environment::with_prefix("BULLETIN")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("announcements.user_fields")
                    .with_list_parse_key("announcements.user_predicates")
                    .try_parsing(true),
            )

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://bulletin.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_duration_hours: 24,
            },
            announcements: AnnouncementConfig::default(),
        }
    }
}
