//! The fallback handler for routes that do not exist.

use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use crate::Error;

/// Respond with a JSON 404 error for any route that is not part of the API.
pub async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("No route for {uri}");
    Error::NotFound.into_response()
}
