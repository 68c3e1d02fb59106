use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "tube-summarizer")]
#[command(about = "HTTP service that summarizes YouTube transcripts", long_about = None)]
pub struct AppConfig {
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind_addr: SocketAddr,

    /// Comma separated language codes tried before English, e.g. `fr,de`.
    #[arg(long, env = "PREFERRED_LANGUAGES", value_delimiter = ',')]
    pub preferred_languages: Vec<String>,

    #[arg(long, env = "CAPTION_BASE_URL", default_value = "https://www.youtube.com")]
    pub caption_base_url: String,

    #[arg(long, env = "INNERTUBE_CLIENT_VERSION", default_value = "20.10.38")]
    pub innertube_client_version: String,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 16 * 1024)]
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env_and_args() -> Self {
        Self::parse()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn preferred_languages(&self) -> Vec<String> {
        self.preferred_languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        let base = url::Url::parse(&self.caption_base_url)
            .map_err(|_| "Invalid CAPTION_BASE_URL format".to_string())?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err("CAPTION_BASE_URL must be http or https".into());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be > 0".into());
        }
        if self.fetch_timeout_secs > 120 {
            return Err("fetch_timeout_secs too large (max 120)".into());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be > 0".into());
        }
        if self.max_body_bytes > 1024 * 1024 {
            return Err("max_body_bytes too large (max 1MB)".into());
        }
        if self.innertube_client_version.trim().is_empty() {
            return Err("innertube_client_version must not be empty".into());
        }
        for lang in self.preferred_languages() {
            if !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(format!("invalid language code: {lang}"));
            }
        }
        Ok(())
    }
}
