//! Image analysis endpoints.
//!
//! Two response shapes exist for historical reasons and both are
//! supported: `/api/analyze` returns the full array of structured reports,
//! `/api/v1/analyze` returns the first report as a bare object for clients
//! built against the original single-result contract.

use axum::{Json, extract::Multipart, extract::State};
use serde_json::{Value, json};

use dermalens_analysis::{AnalysisError, AnalysisReport, ImageData, PatientContext};
use dermalens_auth::BearerAuth;

use crate::error::ApiError;
use crate::state::AppState;

/// Fields extracted from the multipart upload.
struct AnalyzeUpload {
    image: ImageData,
    context: PatientContext,
}

async fn read_upload(mut multipart: Multipart) -> Result<AnalyzeUpload, ApiError> {
    let mut image = None;
    let mut context = PatientContext::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_request(format!("unreadable multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::invalid_request(format!("failed to read image field: {e}"))
                })?;
                if bytes.is_empty() {
                    return Err(ApiError::invalid_request("image field is empty"));
                }
                image = Some(ImageData::new(&bytes, &content_type));
            }
            "name" => context.name = read_text_field(field).await?,
            "duration" => context.duration = read_text_field(field).await?,
            "symptoms" => context.symptoms = read_text_field(field).await?,
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::invalid_request("image field is required"))?;
    Ok(AnalyzeUpload { image, context })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>, ApiError> {
    let text = field
        .text()
        .await
        .map_err(|e| ApiError::invalid_request(format!("unreadable form field: {e}")))?;
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}

async fn run_analysis(
    state: &AppState,
    username: &str,
    upload: AnalyzeUpload,
) -> Result<Vec<AnalysisReport>, ApiError> {
    tracing::info!(username, "analysis request received");

    let context = (!upload.context.is_empty()).then_some(&upload.context);
    let reports = state.analyzer.analyze(&upload.image, context).await?;
    Ok(reports)
}

/// `POST /api/analyze` — current contract: array of structured reports.
pub async fn analyze_handler(
    State(state): State<AppState>,
    BearerAuth(account): BearerAuth,
    multipart: Multipart,
) -> Result<Json<Vec<AnalysisReport>>, ApiError> {
    let upload = read_upload(multipart).await?;
    let reports = run_analysis(&state, &account.username, upload).await?;
    Ok(Json(reports))
}

/// `POST /api/v1/analyze` — legacy contract: the first report as a bare
/// object, wrapped the way the original endpoint replied.
pub async fn analyze_v1_handler(
    State(state): State<AppState>,
    BearerAuth(account): BearerAuth,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let reports = run_analysis(&state, &account.username, upload).await?;

    // Normalization guarantees a non-empty sequence.
    let first = reports
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::upstream("analysis produced no reports"))?;
    Ok(Json(json!({ "analysis": first, "success": true })))
}
