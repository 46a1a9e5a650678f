//! Raw TMDB API response types.
//!
//! These mirror the upstream JSON; mapping into the public response shapes
//! happens in the assembler.

use serde::Deserialize;

/// One page of a paginated TMDB search response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for TmdbPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// Movie entry from `/search/movie`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Series entry from `/search/tv`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeries {
    pub id: i64,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

/// Season summary within `/tv/{id}` details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeason {
    pub season_number: i64,
    #[serde(default)]
    pub episode_count: i64,
}

fn default_status() -> String {
    "Unknown".to_string()
}

/// Response of `/movie/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub runtime: i64,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Response of `/tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeriesDetails {
    pub id: i64,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub number_of_seasons: i64,
    #[serde(default)]
    pub number_of_episodes: i64,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub seasons: Vec<TmdbSeason>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}
