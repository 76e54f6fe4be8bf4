use std::env;
use std::time::Duration;

/// How long a typing indicator stays up without a renewed signal.
pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_secs(5);

/// Client-wide settings shared by every conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Mark each reconciled message as read as soon as it arrives.
    pub auto_mark: bool,
    /// Quiet period after which a typing user is dropped.
    pub typing_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let auto_mark = env::var("HUDDLE_AUTO_MARK")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.auto_mark);
        let typing_timeout = env::var("HUDDLE_TYPING_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.typing_timeout);
        Ok(Self {
            auto_mark,
            typing_timeout,
        })
    }

    pub fn with_auto_mark(mut self, auto_mark: bool) -> Self {
        self.auto_mark = auto_mark;
        self
    }

    pub fn with_typing_timeout(mut self, timeout: Duration) -> Self {
        self.typing_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auto_mark: false,
            typing_timeout: DEFAULT_TYPING_TIMEOUT,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
