//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::protocol::{
    ChartRequestBody, OpeningRequestBody, ReplyRequestBody, ReplyResponse, SystemInfo,
};
use crate::web::state::AppState;
use axum::{extract::State, response::Json};
use star_talks_core::{chart::methodology, AstrologicalSystem, ChartData};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_systems_handler,
        compute_chart_handler,
        open_conversation_handler,
        reply_handler,
    ),
    components(
        schemas(ChartRequestBody, OpeningRequestBody, ReplyRequestBody, ReplyResponse, SystemInfo, ErrorBody)
    ),
    tags(
        (name = "Star Talks API", description = "Chart calculation and astrologer chat endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the supported astrological traditions.
#[utoipa::path(
    get,
    path = "/systems",
    responses(
        (status = 200, description = "The four traditions", body = [SystemInfo])
    )
)]
pub async fn list_systems_handler() -> Json<Vec<SystemInfo>> {
    let systems = AstrologicalSystem::ALL
        .iter()
        .map(|system| SystemInfo {
            system: *system,
            title: system.title().to_string(),
            methodology: methodology(*system).to_string(),
            description: system.guidance().to_string(),
            uses_lagna: system.uses_lagna(),
        })
        .collect();
    Json(systems)
}

/// Compute a birth chart.
///
/// The returned chart is tagged with the requested `system` and carries either
/// `lagna` (western, vedic, hellenistic) or `pillars` (chinese).
#[utoipa::path(
    post,
    path = "/charts",
    request_body = ChartRequestBody,
    responses(
        (status = 200, description = "Chart computed successfully"),
        (status = 422, description = "Malformed request body or unknown system"),
        (status = 502, description = "The chart could not be calculated", body = ErrorBody)
    )
)]
pub async fn compute_chart_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<ChartRequestBody>,
) -> Result<Json<ChartData>, ApiError> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /charts system={}", request_id, body.system);
    let chart = app_state
        .charts
        .compute_chart(&body.details, body.system)
        .await?;
    Ok(Json(chart))
}

/// Ask for the opening assessment of a chart.
#[utoipa::path(
    post,
    path = "/conversations/opening",
    request_body = OpeningRequestBody,
    responses(
        (status = 200, description = "Opening reply generated", body = ReplyResponse),
        (status = 502, description = "The conversation was interrupted", body = ErrorBody)
    )
)]
pub async fn open_conversation_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<OpeningRequestBody>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /conversations/opening system={}", request_id, body.system);
    let reply = app_state
        .conversations
        .open_conversation(body.chart.as_ref(), &body.details, body.system)
        .await?;
    Ok(Json(ReplyResponse { reply }))
}

/// Ask for the next assistant turn of a conversation.
#[utoipa::path(
    post,
    path = "/conversations/reply",
    request_body = ReplyRequestBody,
    responses(
        (status = 200, description = "Reply generated", body = ReplyResponse),
        (status = 502, description = "The conversation was interrupted", body = ErrorBody)
    )
)]
pub async fn reply_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<ReplyRequestBody>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] POST /conversations/reply system={} turns={}",
        request_id,
        body.system,
        body.history.len()
    );
    if body.chart.as_ref().is_some_and(|c| c.system() != body.system) {
        warn!("[{}] Chart tradition differs from the requested system; forwarding as given.", request_id);
    }
    let reply = app_state
        .conversations
        .continue_conversation(&body.history, body.chart.as_ref(), &body.details, body.system)
        .await?;
    Ok(Json(ReplyResponse { reply }))
}
