use std::sync::Arc;

mod config;
mod errors;
mod health;
mod http;
mod logging;
mod service;
mod summarize;
mod transcript;

use crate::config::AppConfig;
use crate::service::SummarizerService;
use crate::summarize::TextRankSummarizer;
use crate::transcript::YoutubeCaptionProvider;

// The runtime is built by hand: the blocking provider client and the startup
// probe must be created outside of any async context.
fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cfg = AppConfig::from_env_and_args();
    if let Err(e) = cfg.validate() {
        tracing::error!(config_error = %e, "invalid config");
        anyhow::bail!("invalid config: {e}");
    }

    let provider = YoutubeCaptionProvider::new(
        cfg.caption_base_url.clone(),
        cfg.innertube_client_version.clone(),
        cfg.fetch_timeout(),
    )?;

    // Startup health check (best-effort, logged only)
    let provider_ok = health::check_provider(&cfg.caption_base_url, cfg.fetch_timeout());
    let preferred_languages = cfg.preferred_languages();
    tracing::info!(
        provider_ok,
        caption_base_url = %cfg.caption_base_url,
        preferred_languages = ?preferred_languages,
        fetch_timeout_secs = cfg.fetch_timeout_secs,
        "startup checks complete"
    );

    let service = Arc::new(SummarizerService::new(
        Arc::new(provider),
        Arc::new(TextRankSummarizer),
        preferred_languages,
    ));
    let app = http::router(service, cfg.max_body_bytes);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(http::serve(cfg.bind_addr, app))
}
