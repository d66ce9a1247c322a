use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback voice service host when neither the request nor `VOICE_HOST` names one.
pub const DEFAULT_VOICE_HOST: &str = "172.31.27.59";
pub const DEFAULT_VOICE_PORT: &str = "8774";
pub const LISTEN_PORT: u16 = 3000;

const TEXT_FILE_NAME: &str = "text.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub voice: VoiceTarget,
    pub text_file: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let voice = VoiceTarget::from_lookup(|key| std::env::var(key).ok());

        let text_file = non_empty(std::env::var("TEXT_FILE").ok())
            .map(PathBuf::from)
            .unwrap_or_else(default_text_file);

        let static_dir = non_empty(std::env::var("STATIC_DIR").ok())
            .unwrap_or_else(|| "static".to_string())
            .into();

        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT)),
            voice,
            text_file,
            static_dir,
        }
    }
}

/// Environment-level defaults for the upstream voice service.
///
/// `host` may be overridden per request; `port` may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceTarget {
    pub host: Option<String>,
    pub port: String,
}

impl VoiceTarget {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: non_empty(lookup("VOICE_HOST")),
            port: non_empty(lookup("VOICE_PORT")).unwrap_or_else(|| DEFAULT_VOICE_PORT.to_string()),
        }
    }

    /// Resolve the base URL for one request: query host, then environment, then default.
    pub fn base_url(&self, query_host: Option<&str>) -> String {
        let host = query_host
            .filter(|h| !h.is_empty())
            .or(self.host.as_deref())
            .unwrap_or(DEFAULT_VOICE_HOST);
        format!("http://{}:{}", host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn default_text_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEXT_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(TEXT_FILE_NAME))
}
