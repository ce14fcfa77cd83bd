//! Map generation endpoint
//!
//! POST /generate-map with a multipart `file` field holding the member CSV.
//! The rendered map is returned straight from memory as HTML.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::pipeline::PipelineError;
use crate::AppState;

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Accepted upload extensions (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 1] = ["csv"];

/// A validated CSV upload
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// POST /generate-map
pub async fn generate_map(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let request_id = Uuid::new_v4();
    handle_upload(state, multipart)
        .instrument(info_span!("generate_map", %request_id))
        .await
}

async fn handle_upload(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let multipart = multipart.map_err(|rejection| {
        ApiError::BadRequest(format!("No file provided ({})", rejection.body_text()))
    })?;
    let upload = read_upload(multipart).await?;
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "Received member upload");

    let artifact = crate::pipeline::generate_map(&upload.bytes, state.resolver.as_ref()).await?;
    let html = artifact.to_html().map_err(PipelineError::from)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                HeaderName::from_static("x-member-count"),
                artifact.member_count.to_string(),
            ),
            (
                HeaderName::from_static("x-marker-count"),
                artifact.markers.len().to_string(),
            ),
            (
                HeaderName::from_static("x-unresolved-count"),
                artifact.unresolved_count().to_string(),
            ),
        ],
        html,
    )
        .into_response())
}

/// Pull the `file` field out of the form and validate it
///
/// Checks run in order: field present, filename present, allowed extension.
pub async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(ApiError::BadRequest("No file selected".to_string()));
        }
        if !allowed_file(&filename) {
            return Err(ApiError::BadRequest(
                "Invalid file type. Please upload a CSV file.".to_string(),
            ));
        }

        let bytes = field.bytes().await?;
        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}

/// True if the filename has an allowed extension
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Build map generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate-map", post(generate_map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("members.csv"));
        assert!(allowed_file("MEMBERS.CSV"));
        assert!(allowed_file("team.export.Csv"));
        assert!(!allowed_file("members.txt"));
        assert!(!allowed_file("csv"));
        assert!(!allowed_file("members.csv.txt"));
        assert!(!allowed_file("members."));
    }
}
