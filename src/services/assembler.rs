//! Response assembly.
//!
//! Pure mapping from TMDB records plus probe results into the public
//! response shapes. Reported totals (`number_of_seasons`,
//! `number_of_episodes`) always come from metadata; probe results only fill
//! the validity fields and URLs.

use crate::models::{
    tmdb::{TmdbMovie, TmdbMovieDetails, TmdbSeries, TmdbSeriesDetails},
    MovieAvailability, MovieDetails, MovieSearchResult, SearchItem, SeriesAvailability,
    SeriesDetails, SeriesSearchResult,
};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

// The webapp keys off these exact placeholder values.
const MOVIE_POSTER_PLACEHOLDER: &str = "No poster found";
const SERIES_POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/200x300.png?text=No+Poster";

fn movie_poster(path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{}{}", POSTER_BASE_URL, path),
        None => MOVIE_POSTER_PLACEHOLDER.to_string(),
    }
}

fn series_poster(path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{}{}", POSTER_BASE_URL, path),
        None => SERIES_POSTER_PLACEHOLDER.to_string(),
    }
}

fn backdrop(path: Option<&str>) -> Option<String> {
    path.map(|path| format!("{}{}", BACKDROP_BASE_URL, path))
}

fn genre_names(genres: Vec<crate::models::tmdb::TmdbGenre>) -> Vec<String> {
    genres.into_iter().map(|genre| genre.name).collect()
}

pub fn movie_search_results(movies: Vec<TmdbMovie>) -> Vec<SearchItem> {
    movies
        .into_iter()
        .map(|movie| {
            SearchItem::Movie(MovieSearchResult {
                id: movie.id,
                original_title: movie.original_title,
                overview: movie.overview,
                release_date: movie.release_date,
                vote_average: movie.vote_average,
                poster: movie_poster(movie.poster_path.as_deref()),
            })
        })
        .collect()
}

pub fn series_search_results(series: Vec<TmdbSeries>) -> Vec<SearchItem> {
    series
        .into_iter()
        .map(|series| {
            SearchItem::Series(SeriesSearchResult {
                id: series.id,
                name: series.original_name,
                air_date: series.first_air_date.unwrap_or_else(|| "N/A".to_string()),
                vote_avg: series.vote_average,
                overview: series.overview,
                poster: series_poster(series.poster_path.as_deref()),
            })
        })
        .collect()
}

pub fn movie_details(metadata: TmdbMovieDetails, availability: MovieAvailability) -> MovieDetails {
    MovieDetails {
        id: metadata.id,
        url: availability.url,
        is_available: availability.is_available,
        original_title: metadata.original_title,
        overview: metadata.overview,
        release_date: metadata.release_date,
        vote_average: metadata.vote_average,
        vote_count: metadata.vote_count,
        runtime: metadata.runtime,
        genres: genre_names(metadata.genres),
        poster: movie_poster(metadata.poster_path.as_deref()),
        backdrop_path: backdrop(metadata.backdrop_path.as_deref()),
        budget: metadata.budget,
        revenue: metadata.revenue,
        status: metadata.status,
    }
}

pub fn series_details(
    metadata: TmdbSeriesDetails,
    availability: SeriesAvailability,
) -> SeriesDetails {
    SeriesDetails {
        id: metadata.id,
        name: metadata.original_name,
        air_date: metadata
            .first_air_date
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        vote_avg: metadata.vote_average,
        overview: metadata.overview,
        poster: series_poster(metadata.poster_path.as_deref()),
        is_available: availability.is_available,
        valid_seasons: availability.valid_seasons,
        valid_episodes: availability.valid_episodes,
        streaming_urls: availability.streaming_urls,
        number_of_seasons: metadata.number_of_seasons,
        number_of_episodes: metadata.number_of_episodes,
        status: metadata.status,
        genres: genre_names(metadata.genres),
        backdrop_path: backdrop(metadata.backdrop_path.as_deref()),
        first_air_date: metadata
            .first_air_date
            .unwrap_or_else(|| "Unknown".to_string()),
        last_air_date: metadata
            .last_air_date
            .unwrap_or_else(|| "Unknown".to_string()),
        vote_count: metadata.vote_count,
        popularity: metadata.popularity,
    }
}
