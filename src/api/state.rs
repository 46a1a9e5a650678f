use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::AppResult,
    middleware::RateLimiter,
    services::{
        probe::{HttpProbe, StreamProber},
        tmdb::{MetadataProvider, TmdbClient},
    },
};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; StreamPortal/1.0)";

/// Process-wide state shared by all handlers.
///
/// Built once at startup and torn down with the process; request handling
/// never mutates it.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<dyn MetadataProvider>,
    pub prober: Arc<StreamProber>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        prober: Arc<StreamProber>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            metadata,
            prober,
            rate_limiter,
        }
    }

    /// Wire up live clients; one HTTP connection pool is shared between the
    /// metadata client and the prober.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let metadata = TmdbClient::new(
            http_client.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        );
        let probe = HttpProbe::new(
            http_client,
            Duration::from_secs(config.probe_timeout_secs),
        );
        let prober = StreamProber::new(
            Arc::new(probe),
            &config.stream_base_url,
            config.probe_concurrency,
        );

        Ok(Self::new(
            Arc::new(metadata),
            Arc::new(prober),
            Arc::new(RateLimiter::new(config.rate_limit_per_minute)),
        ))
    }
}
