//! API handlers for the ad review server
//!
//! Provides REST endpoints for:
//! - Ad image analysis
//! - Health checks

use std::time::Instant;

use ad_report::{parse_ad_report, AdReport};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use vision_client::{first_text, with_deadline, ImageInput};

use crate::error::ApiError;
use crate::upload::{validate_image, ImageKind, TempUpload};
use crate::AppState;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "adImage";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "adreview-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Analysis response
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AdReport,
}

/// The image part of an upload, before validation
struct ImageField {
    content_type: Option<String>,
    file_name: Option<String>,
    data: Bytes,
}

/// Pull the first `adImage` field out of the form, ignoring any others
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ImageField>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(Some(ImageField {
            content_type,
            file_name,
            data,
        }));
    }

    Ok(None)
}

/// Handler: POST /analyze-ad
pub async fn handle_analyze_ad(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let start = Instant::now();

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(%rejection, "Request is not a multipart upload");
            return Err(ApiError::NoImage);
        }
    };

    let field = read_image_field(&mut multipart)
        .await?
        .filter(|field| !field.data.is_empty())
        .ok_or(ApiError::NoImage)?;

    if field.data.len() > state.config.max_upload_bytes {
        return Err(ApiError::FileTooLarge);
    }

    let declared = field.content_type.as_deref();
    let extension = declared
        .and_then(ImageKind::from_mime)
        .map(ImageKind::extension)
        .unwrap_or_default();

    // Dropping the guard removes the file on every path below
    let upload = TempUpload::persist(&state.config.upload_dir, extension, &field.data).await?;
    let kind = validate_image(declared, &field.data)?;

    info!(
        file_name = field.file_name.as_deref().unwrap_or(""),
        media_type = kind.mime_type(),
        bytes = field.data.len(),
        path = %upload.path().display(),
        "Analyzing ad image"
    );

    let image = ImageInput::new(kind.mime_type(), upload.read().await?);
    let blocks = with_deadline(state.model.analyze(&image), state.config.upstream_timeout).await?;

    let analysis = parse_ad_report(first_text(&blocks).unwrap_or(""));

    info!(
        model = state.model.name(),
        sections = analysis.sections().count(),
        has_summary = analysis.summary.is_some(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Ad analysis complete"
    );

    Ok(Json(AnalyzeResponse { analysis }))
}
