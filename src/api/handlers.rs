//! Handlers for the token map, solution and role-play contract

use super::error::{from_service, validation, ApiFailure};
use crate::models::{
    ExportFormat, GenerateTokenMapRequest, RecommendRequest, RefineRequest, RespondRequest,
    RolePlaySession, RolePlayTurn, Solution, SolutionVersion, StartSessionRequest, TokenMapData,
    TokenMapPatch,
};
use crate::services::Services;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

/// State shared by every handler
#[derive(Clone)]
pub struct ApiState {
    pub services: Services,
}

type ApiResult<T> = Result<Json<T>, ApiFailure>;

/// POST /token-map/generate
pub async fn generate_token_map(
    State(state): State<ApiState>,
    Json(request): Json<GenerateTokenMapRequest>,
) -> ApiResult<TokenMapData> {
    if request.company_name.trim().is_empty() {
        return Err(validation("company_name cannot be empty"));
    }

    info!("Token map generate request: company={}", request.company_name);
    state
        .services
        .token_map
        .generate(request)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /token-map/:id
pub async fn get_token_map(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<TokenMapData> {
    state
        .services
        .token_map
        .get(&id)
        .await
        .map(Json)
        .map_err(from_service)
}

/// PUT /token-map/:id
pub async fn update_token_map(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<TokenMapPatch>,
) -> ApiResult<TokenMapData> {
    state
        .services
        .token_map
        .update(&id, patch)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /token-map/customer/:customer_id
pub async fn list_token_maps(
    State(state): State<ApiState>,
    Path(customer_id): Path<String>,
) -> ApiResult<Vec<TokenMapData>> {
    state
        .services
        .token_map
        .list_by_customer(&customer_id)
        .await
        .map(Json)
        .map_err(from_service)
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// GET /token-map/:id/export?format={json|png|pdf}
pub async fn export_token_map(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiFailure> {
    let format = match query.format.as_deref() {
        None => ExportFormat::Json,
        Some(raw) => raw.parse::<ExportFormat>().map_err(validation)?,
    };

    let file = state
        .services
        .token_map
        .export(&id, format)
        .await
        .map_err(from_service)?;

    let disposition = format!("attachment; filename=\"{}.{}\"", id, format.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// POST /solution/recommend
pub async fn recommend_solution(
    State(state): State<ApiState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Solution> {
    if request.requirements.trim().is_empty() {
        return Err(validation("requirements cannot be empty"));
    }

    state
        .services
        .solution
        .recommend(request)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /solution/:id
pub async fn get_solution(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Solution> {
    state
        .services
        .solution
        .get(&id)
        .await
        .map(Json)
        .map_err(from_service)
}

/// POST /solution/:id/refine
pub async fn refine_solution(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<RefineRequest>,
) -> ApiResult<Solution> {
    if request.feedback.trim().is_empty() {
        return Err(validation("feedback cannot be empty"));
    }

    state
        .services
        .solution
        .refine(&id, &request.feedback)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /solution/:id/history
pub async fn solution_history(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<SolutionVersion>> {
    state
        .services
        .solution
        .history(&id)
        .await
        .map(Json)
        .map_err(from_service)
}

/// POST /role-play/start
pub async fn start_session(
    State(state): State<ApiState>,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<RolePlaySession> {
    info!("Role-play start request: scenario={}", request.scenario);
    state
        .services
        .role_play
        .start(request)
        .await
        .map(Json)
        .map_err(from_service)
}

/// POST /role-play/:id/respond
pub async fn respond(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<RespondRequest>,
) -> ApiResult<RolePlayTurn> {
    if request.message.trim().is_empty() {
        return Err(validation("message cannot be empty"));
    }

    state
        .services
        .role_play
        .respond(&id, &request.message)
        .await
        .map(Json)
        .map_err(from_service)
}

/// POST /role-play/:id/end
pub async fn end_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<RolePlaySession> {
    state
        .services
        .role_play
        .end(&id)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /role-play/:id
pub async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<RolePlaySession> {
    state
        .services
        .role_play
        .get(&id)
        .await
        .map(Json)
        .map_err(from_service)
}

/// GET /role-play/sessions
pub async fn list_sessions(State(state): State<ApiState>) -> ApiResult<Vec<RolePlaySession>> {
    state
        .services
        .role_play
        .list()
        .await
        .map(Json)
        .map_err(from_service)
}
