//! Core entry points consumed by the HTTP handlers.
//!
//! Validation runs before any outbound call, so a bad request never reaches
//! TMDB or the streaming host.

use crate::{
    error::AppResult,
    models::{
        ContentDetails, ContentType, DetailsRequest, DetailsResponse, SearchRequest,
        SearchResponse,
    },
    services::{assembler, probe::StreamProber, tmdb::MetadataProvider},
};

/// Search for movies or series; returns basic info without availability.
pub async fn perform_search(
    metadata: &dyn MetadataProvider,
    request: &SearchRequest,
) -> AppResult<SearchResponse> {
    request.validate()?;

    let results = match request.type_of_content {
        ContentType::Movie => assembler::movie_search_results(
            metadata
                .search_movies(request.query(), &request.option_language)
                .await?,
        ),
        ContentType::Series => assembler::series_search_results(
            metadata
                .search_series(request.query(), &request.option_language)
                .await?,
        ),
    };

    Ok(SearchResponse { results })
}

/// Fetch full details for one title, including the availability sweep.
pub async fn perform_details(
    metadata: &dyn MetadataProvider,
    prober: &StreamProber,
    request: &DetailsRequest,
) -> AppResult<DetailsResponse> {
    request.validate()?;

    let details = match request.type_of_content {
        ContentType::Movie => {
            let record = metadata
                .movie_details(request.content_id, &request.option_language)
                .await?;
            let availability = prober.check_movie(record.id).await;
            ContentDetails::Movie(Box::new(assembler::movie_details(record, availability)))
        }
        ContentType::Series => {
            let record = metadata
                .series_details(request.content_id, &request.option_language)
                .await?;
            let availability = prober.check_series(record.id, &record.seasons).await?;
            ContentDetails::Series(Box::new(assembler::series_details(record, availability)))
        }
    };

    Ok(DetailsResponse { details })
}
