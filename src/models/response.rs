//! Public response shapes.
//!
//! Field names here are part of the API contract and must not drift: search
//! results and the two detail shapes are consumed as-is by the webapp.

use std::collections::BTreeMap;

use serde::Serialize;

/// Movie entry in `POST /search` results.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieSearchResult {
    pub id: i64,
    pub original_title: String,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub poster: String,
}

/// Series entry in `POST /search` results.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesSearchResult {
    pub id: i64,
    pub name: String,
    pub air_date: String,
    pub vote_avg: f64,
    pub overview: String,
    pub poster: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SearchItem {
    Movie(MovieSearchResult),
    Series(SeriesSearchResult),
}

/// Envelope of `POST /search`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchItem>,
}

/// Detail shape for movies.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    pub url: Option<String>,
    pub is_available: bool,
    pub original_title: String,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub runtime: i64,
    pub genres: Vec<String>,
    pub poster: String,
    pub backdrop_path: Option<String>,
    pub budget: i64,
    pub revenue: i64,
    pub status: String,
}

/// Detail shape for series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesDetails {
    pub id: i64,
    pub name: String,
    pub air_date: String,
    pub vote_avg: f64,
    pub overview: String,
    pub poster: String,
    pub is_available: bool,
    pub valid_seasons: Vec<u32>,
    pub valid_episodes: BTreeMap<u32, Vec<u32>>,
    pub streaming_urls: Vec<String>,
    pub number_of_seasons: i64,
    pub number_of_episodes: i64,
    pub status: String,
    pub genres: Vec<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: String,
    pub last_air_date: String,
    pub vote_count: i64,
    pub popularity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ContentDetails {
    Movie(Box<MovieDetails>),
    Series(Box<SeriesDetails>),
}

/// Envelope of `POST /details`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailsResponse {
    pub details: ContentDetails,
}
