use std::time::Duration;

/// Runtime configuration, read from environment variables with defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub bind_addr: String,
    /// Maximum events retained per room; 0 keeps everything
    pub history_capacity: usize,
    pub assistant_url: Option<String>,
    pub assistant_timeout: Duration,
    /// Rooms pre-populated in the catalog at startup
    pub default_rooms: Vec<String>,
    pub jwt_secret: String,
    pub session_expiration_days: i64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            history_capacity: 500,
            assistant_url: None,
            assistant_timeout: Duration::from_millis(8000),
            default_rooms: vec!["general".to_string(), "random".to_string()],
            jwt_secret: "your-secret-key-change-in-production".to_string(),
            session_expiration_days: 1,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Values that fail to
    /// parse keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let history_capacity = lookup("HISTORY_CAPACITY")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.history_capacity);

        let assistant_url = lookup("ASSISTANT_URL").filter(|url| !url.trim().is_empty());

        let assistant_timeout = lookup("ASSISTANT_TIMEOUT_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.assistant_timeout);

        let default_rooms = lookup("DEFAULT_ROOMS")
            .map(|rooms| {
                rooms
                    .split(',')
                    .map(str::trim)
                    .filter(|room| !room.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.default_rooms);

        let jwt_secret = lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret);

        let session_expiration_days = lookup("SESSION_EXPIRATION_DAYS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.session_expiration_days);

        Self {
            bind_addr,
            history_capacity,
            assistant_url,
            assistant_timeout,
            default_rooms,
            jwt_secret,
            session_expiration_days,
        }
    }
}
