use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub mod response;
pub mod tmdb;

pub use response::{
    ContentDetails, DetailsResponse, MovieDetails, MovieSearchResult, SearchItem, SearchResponse,
    SeriesDetails, SeriesSearchResult,
};

/// Type of content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContentType {
    Movie,
    Series,
}

fn default_language() -> String {
    "en-US".to_string()
}

/// Body of `POST /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub text_search: String,
    pub type_of_content: ContentType,
    #[serde(default = "default_language")]
    pub option_language: String,
}

impl SearchRequest {
    /// The trimmed search query.
    pub fn query(&self) -> &str {
        self.text_search.trim()
    }

    pub fn validate(&self) -> AppResult<()> {
        let query = self.query();
        if query.is_empty() {
            return Err(AppError::validation(
                "Search query cannot be empty",
                "text_search",
            ));
        }
        if query.chars().count() < 2 {
            return Err(AppError::validation(
                "Search query must be at least 2 characters long",
                "text_search",
            ));
        }
        if self.text_search.chars().count() > 100 {
            return Err(AppError::validation(
                "Search query too long (max 100 characters)",
                "text_search",
            ));
        }
        Ok(())
    }
}

/// Body of `POST /details`
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsRequest {
    pub content_id: i64,
    pub type_of_content: ContentType,
    #[serde(default = "default_language")]
    pub option_language: String,
}

impl DetailsRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.content_id <= 0 {
            return Err(AppError::validation(
                "Content ID must be a positive integer",
                "content_id",
            ));
        }
        Ok(())
    }
}

/// Result of the single-probe availability check for a movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieAvailability {
    /// Canonical stream URL, present only when the probe succeeded.
    pub url: Option<String>,
    pub is_available: bool,
}

/// Aggregated result of the per-episode availability sweep for a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesAvailability {
    /// Seasons with at least one reachable episode, ascending.
    pub valid_seasons: Vec<u32>,
    /// Season number -> ascending reachable episode numbers.
    pub valid_episodes: BTreeMap<u32, Vec<u32>>,
    /// Reachable candidate URLs in ascending (season, episode) order.
    pub streaming_urls: Vec<String>,
    pub is_available: bool,
}
