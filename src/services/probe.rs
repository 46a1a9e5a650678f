//! Streaming availability prober.
//!
//! A probe is a single GET against a candidate stream URL; any status in
//! 200-399 counts as reachable, anything else (including timeouts and
//! transport errors) as unreachable. For series the prober sweeps every
//! (season, episode) pair reported by metadata with bounded concurrency and
//! joins on the whole batch, keeping partial successes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};

use crate::{
    error::{AppError, AppResult},
    models::{tmdb::TmdbSeason, MovieAvailability, SeriesAvailability},
};

/// Seasons swept per series are capped to bound probe volume.
const MAX_SEASONS: usize = 10;

/// Reachability check against a candidate URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

/// `UrlProbe` backed by the shared HTTP client.
pub struct HttpProbe {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(http_client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status.is_redirection()
            }
            Err(_) => false,
        }
    }
}

/// One (season, episode) candidate within a series sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProbeUnit {
    season: u32,
    episode: u32,
    candidate_url: String,
}

/// Checks which content has a working stream URL on the streaming host.
pub struct StreamProber {
    probe: Arc<dyn UrlProbe>,
    base_url: String,
    concurrency: usize,
}

impl StreamProber {
    pub fn new(probe: Arc<dyn UrlProbe>, base_url: &str, concurrency: usize) -> Self {
        Self {
            probe,
            base_url: base_url.trim_end_matches('/').to_string(),
            concurrency: concurrency.max(1),
        }
    }

    /// Canonical stream URL for a movie.
    pub fn movie_url(&self, content_id: i64) -> String {
        format!("{}/movie/{}", self.base_url, content_id)
    }

    /// Canonical stream URL for one episode.
    pub fn episode_url(&self, content_id: i64, season: u32, episode: u32) -> String {
        format!("{}/tv/{}/{}/{}", self.base_url, content_id, season, episode)
    }

    /// Single-probe availability check for a movie.
    pub async fn check_movie(&self, content_id: i64) -> MovieAvailability {
        let url = self.movie_url(content_id);
        let is_available = self.probe.is_reachable(&url).await;

        tracing::debug!(content_id, is_available, "Movie availability checked");

        MovieAvailability {
            url: is_available.then_some(url),
            is_available,
        }
    }

    /// Concurrent availability sweep over every episode metadata reports.
    ///
    /// Individual probe failures read as "unavailable for that episode"; the
    /// call errors only when metadata yields no candidates at all.
    pub async fn check_series(
        &self,
        content_id: i64,
        seasons: &[TmdbSeason],
    ) -> AppResult<SeriesAvailability> {
        let units = self.series_candidates(content_id, seasons);
        if units.is_empty() {
            return Err(AppError::StreamingAvailability {
                message: format!("No streamable episodes known for series {}", content_id),
                content_id,
            });
        }

        let total = units.len();
        let checks = units.into_iter().map(|unit| {
            let probe = Arc::clone(&self.probe);
            async move {
                let reachable = probe.is_reachable(&unit.candidate_url).await;
                (unit, reachable)
            }
        });

        let outcomes: Vec<(ProbeUnit, bool)> = stream::iter(checks)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let availability = collect_series_availability(outcomes);

        tracing::info!(
            content_id,
            probed = total,
            reachable = availability.streaming_urls.len(),
            valid_seasons = availability.valid_seasons.len(),
            "Series availability sweep completed"
        );

        Ok(availability)
    }

    fn series_candidates(&self, content_id: i64, seasons: &[TmdbSeason]) -> Vec<ProbeUnit> {
        let mut units = Vec::new();

        for season in seasons
            .iter()
            .filter(|s| s.season_number >= 1 && s.episode_count >= 1)
            .take(MAX_SEASONS)
        {
            let season_number = season.season_number as u32;
            for episode in 1..=season.episode_count as u32 {
                units.push(ProbeUnit {
                    season: season_number,
                    episode,
                    candidate_url: self.episode_url(content_id, season_number, episode),
                });
            }
        }

        units
    }
}

/// Fold probe outcomes into the aggregated per-season view.
///
/// Outcomes arrive in completion order; outputs are (season, episode)
/// ascending regardless.
fn collect_series_availability(mut outcomes: Vec<(ProbeUnit, bool)>) -> SeriesAvailability {
    outcomes.sort_by_key(|(unit, _)| (unit.season, unit.episode));

    let mut valid_episodes: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    let mut streaming_urls = Vec::new();

    for (unit, reachable) in outcomes {
        if reachable {
            valid_episodes
                .entry(unit.season)
                .or_default()
                .push(unit.episode);
            streaming_urls.push(unit.candidate_url);
        }
    }

    let valid_seasons: Vec<u32> = valid_episodes.keys().copied().collect();
    let is_available = !streaming_urls.is_empty();

    SeriesAvailability {
        valid_seasons,
        valid_episodes,
        streaming_urls,
        is_available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio_test::assert_ok;

    const BASE: &str = "https://vixsrc.to";

    fn season(number: i64, episodes: i64) -> TmdbSeason {
        TmdbSeason {
            season_number: number,
            episode_count: episodes,
        }
    }

    /// Probe fake answering from a fixed set of reachable URLs, with an
    /// optional per-probe delay to exercise the concurrent sweep.
    struct FakeProbe {
        reachable: HashSet<String>,
        delay: Duration,
    }

    impl FakeProbe {
        fn reaching<const N: usize>(urls: [&str; N]) -> Self {
            Self {
                reachable: urls.iter().map(|u| u.to_string()).collect(),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl UrlProbe for FakeProbe {
        async fn is_reachable(&self, url: &str) -> bool {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reachable.contains(url)
        }
    }

    fn prober(probe: impl UrlProbe + 'static, concurrency: usize) -> StreamProber {
        StreamProber::new(Arc::new(probe), BASE, concurrency)
    }

    #[test]
    fn test_candidate_url_construction() {
        let prober = prober(FakeProbe::reaching([]), 10);
        assert_eq!(prober.movie_url(786892), "https://vixsrc.to/movie/786892");
        assert_eq!(
            prober.episode_url(1396, 2, 13),
            "https://vixsrc.to/tv/1396/2/13"
        );

        let trimmed = StreamProber::new(
            Arc::new(FakeProbe::reaching([])),
            "https://vixsrc.to/",
            10,
        );
        assert_eq!(trimmed.movie_url(1), "https://vixsrc.to/movie/1");
    }

    #[tokio::test]
    async fn test_check_movie_probes_canonical_url() {
        let mut mock = MockUrlProbe::new();
        mock.expect_is_reachable()
            .withf(|url| url == "https://vixsrc.to/movie/603")
            .once()
            .returning(|_| true);

        let prober = StreamProber::new(Arc::new(mock), BASE, 10);
        let availability = prober.check_movie(603).await;

        assert!(availability.is_available);
        assert_eq!(
            availability.url,
            Some("https://vixsrc.to/movie/603".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_movie_unavailable_has_no_url() {
        let mut mock = MockUrlProbe::new();
        mock.expect_is_reachable().once().returning(|_| false);

        let prober = StreamProber::new(Arc::new(mock), BASE, 10);
        let availability = prober.check_movie(603).await;

        assert!(!availability.is_available);
        assert_eq!(availability.url, None);
    }

    #[tokio::test]
    async fn test_movie_probe_idempotent_given_stable_upstream() {
        let prober = prober(FakeProbe::reaching(["https://vixsrc.to/movie/603"]), 10);

        let first = prober.check_movie(603).await;
        let second = prober.check_movie(603).await;
        assert_eq!(first, second);
        assert!(first.is_available);
    }

    #[tokio::test]
    async fn test_series_sweep_aggregates_partial_successes() {
        // Seasons 1 (3 episodes) and 2 (2 episodes); only (1,1), (1,2) and
        // (2,1) are reachable.
        let probe = FakeProbe::reaching([
            "https://vixsrc.to/tv/100/1/1",
            "https://vixsrc.to/tv/100/1/2",
            "https://vixsrc.to/tv/100/2/1",
        ]);
        let prober = prober(probe, 10);

        let availability = prober
            .check_series(100, &[season(1, 3), season(2, 2)])
            .await
            .unwrap();

        assert!(availability.is_available);
        assert_eq!(availability.valid_seasons, vec![1, 2]);
        assert_eq!(
            availability.valid_episodes,
            BTreeMap::from([(1, vec![1, 2]), (2, vec![1])])
        );
        assert_eq!(
            availability.streaming_urls,
            vec![
                "https://vixsrc.to/tv/100/1/1",
                "https://vixsrc.to/tv/100/1/2",
                "https://vixsrc.to/tv/100/2/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_series_sweep_all_unreachable_is_not_an_error() {
        let prober = prober(FakeProbe::reaching([]), 10);

        let availability = prober.check_series(100, &[season(1, 2)]).await.unwrap();

        assert!(!availability.is_available);
        assert!(availability.valid_seasons.is_empty());
        assert!(availability.valid_episodes.is_empty());
        assert!(availability.streaming_urls.is_empty());
    }

    #[tokio::test]
    async fn test_series_without_candidates_is_an_error() {
        let prober = prober(FakeProbe::reaching([]), 10);

        // Only a specials season and an empty season: nothing to probe.
        let result = prober
            .check_series(100, &[season(0, 4), season(3, 0)])
            .await;

        assert!(matches!(
            result,
            Err(AppError::StreamingAvailability { content_id: 100, .. })
        ));
    }

    #[test]
    fn test_season_zero_and_cap_excluded_from_candidates() {
        let prober = prober(FakeProbe::reaching([]), 10);

        let mut seasons: Vec<TmdbSeason> = (0..=12).map(|n| season(n, 1)).collect();
        seasons.push(season(1, 0));

        let units = prober.series_candidates(100, &seasons);
        let probed: Vec<u32> = units.iter().map(|u| u.season).collect();

        // Season 0 is skipped and the sweep stops after ten seasons.
        assert_eq!(probed, (1..=10).collect::<Vec<u32>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_latency_is_constant_when_concurrency_covers_batch() {
        // 20 episodes at 1s per probe must complete in ~1 probe latency when
        // the concurrency bound covers the whole batch.
        let probe = FakeProbe {
            reachable: HashSet::new(),
            delay: Duration::from_secs(1),
        };
        let prober = prober(probe, 32);

        let start = tokio::time::Instant::now();
        let result = prober.check_series(100, &[season(1, 20)]).await;
        assert_ok!(result);

        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_is_bounded_by_concurrency_limit() {
        // Same batch with a fan-out of 10 needs two waves.
        let probe = FakeProbe {
            reachable: HashSet::new(),
            delay: Duration::from_secs(1),
        };
        let prober = prober(probe, 10);

        let start = tokio::time::Instant::now();
        prober.check_series(100, &[season(1, 20)]).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn test_outputs_ordered_despite_out_of_order_completion() {
        /// Finishes later episodes first so completion order is reversed.
        struct ReversingProbe;

        #[async_trait]
        impl UrlProbe for ReversingProbe {
            async fn is_reachable(&self, url: &str) -> bool {
                let episode: u64 = url.rsplit('/').next().unwrap().parse().unwrap();
                tokio::time::sleep(Duration::from_millis(50 - 10 * episode.min(4))).await;
                true
            }
        }

        let prober = prober(ReversingProbe, 10);
        let availability = prober.check_series(100, &[season(1, 4)]).await.unwrap();

        assert_eq!(availability.valid_episodes[&1], vec![1, 2, 3, 4]);
        assert_eq!(
            availability.streaming_urls,
            vec![
                "https://vixsrc.to/tv/100/1/1",
                "https://vixsrc.to/tv/100/1/2",
                "https://vixsrc.to/tv/100/1/3",
                "https://vixsrc.to/tv/100/1/4",
            ]
        );
    }
}
