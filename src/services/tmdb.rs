//! TMDB metadata client.
//!
//! Search fans out over several result pages concurrently; a page that fails
//! to fetch or parse contributes no results. Detail lookups are strict and
//! surface upstream failures to the caller.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::tmdb::{TmdbMovie, TmdbMovieDetails, TmdbPage, TmdbSeries, TmdbSeriesDetails},
};

const API_NAME: &str = "TMDB API";

/// Pages fetched per movie search.
const MOVIE_SEARCH_PAGES: u32 = 5;
/// Pages fetched per series search.
const SERIES_SEARCH_PAGES: u32 = 3;

/// Source of movie/series metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search_movies(&self, query: &str, language: &str) -> AppResult<Vec<TmdbMovie>>;

    async fn search_series(&self, query: &str, language: &str) -> AppResult<Vec<TmdbSeries>>;

    /// Fails with `NotFound` when the id is unknown upstream.
    async fn movie_details(&self, id: i64, language: &str) -> AppResult<TmdbMovieDetails>;

    async fn series_details(&self, id: i64, language: &str) -> AppResult<TmdbSeriesDetails>;
}

/// TMDB v3 REST client.
#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one search page. Failures degrade to an empty page.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        language: &str,
        page: u32,
    ) -> TmdbPage<T> {
        let url = format!(
            "{}/{}?query={}&include_adult=false&language={}&page={}",
            self.api_url,
            path,
            urlencoding::encode(query),
            language,
            page
        );

        let response = match self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(page, error = %e, "Failed to fetch search page");
                return TmdbPage::default();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                page,
                status = response.status().as_u16(),
                "TMDB returned non-success status for search page"
            );
            return TmdbPage::default();
        }

        match response.json::<TmdbPage<T>>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!(page, error = %e, "Failed to parse search page");
                TmdbPage::default()
            }
        }
    }

    async fn search_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        language: &str,
        pages: u32,
    ) -> Vec<T> {
        let tasks =
            (1..=pages).map(|page| self.fetch_page::<T>(path, query, language, page));

        join_all(tasks)
            .await
            .into_iter()
            .flat_map(|page| page.results)
            .collect()
    }

    async fn fetch_details<T: DeserializeOwned>(
        &self,
        path: &str,
        resource_type: &'static str,
        id: i64,
        language: &str,
    ) -> AppResult<T> {
        let url = format!("{}/{}/{}?language={}", self.api_url, path, id, language);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound {
                message: format!("{} with ID {} not found", resource_type, id),
                resource_type,
                resource_id: id,
            }),
            StatusCode::UNAUTHORIZED => Err(AppError::Authentication(
                "TMDB API key rejected".to_string(),
            )),
            status if !status.is_success() => Err(AppError::ExternalApi {
                message: format!("TMDB API returned status {}", status.as_u16()),
                api_name: API_NAME,
                upstream_status: Some(status.as_u16()),
            }),
            _ => Ok(response.json::<T>().await?),
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_movies(&self, query: &str, language: &str) -> AppResult<Vec<TmdbMovie>> {
        let movies = self
            .search_pages("search/movie", query, language, MOVIE_SEARCH_PAGES)
            .await;

        tracing::info!(query = %query, results = movies.len(), "Movie search completed");
        Ok(movies)
    }

    async fn search_series(&self, query: &str, language: &str) -> AppResult<Vec<TmdbSeries>> {
        let series = self
            .search_pages("search/tv", query, language, SERIES_SEARCH_PAGES)
            .await;

        tracing::info!(query = %query, results = series.len(), "Series search completed");
        Ok(series)
    }

    async fn movie_details(&self, id: i64, language: &str) -> AppResult<TmdbMovieDetails> {
        self.fetch_details("movie", "Movie", id, language).await
    }

    async fn series_details(&self, id: i64, language: &str) -> AppResult<TmdbSeriesDetails> {
        self.fetch_details("tv", "Series", id, language).await
    }
}
