// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Match Group HTTP API
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/health` | liveness probe with uptime |
//! | `POST` | `/api/v1/match-groups` | create a match group for the calling member |
//! | `GET` | `/api/v1/match-groups/members/{member_id}` | groups a member belongs to |
//!
//! The calling member is identified by the `x-member-id` header, which the
//! authenticating gateway sets after session validation. Error bodies are
//! always `{"message": "..."}`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::application::match_group_service::{MatchGroupError, MatchGroupService};
use crate::domain::match_group::{
    validate_member_count, DepartmentFilter, ListMatchGroupsQuery, MatchGroupConfig,
    MatchGroupDetail, MatchGroupSummary, OfficeFilter,
};
use crate::domain::member::MemberId;

/// Header carrying the authenticated member id.
pub const MEMBER_ID_HEADER: &str = "x-member-id";

pub struct AppState {
    pub match_group_service: Arc<dyn MatchGroupService>,
    pub start_time: Instant,
}

pub fn app(service: Arc<dyn MatchGroupService>) -> Router {
    let state = Arc::new(AppState {
        match_group_service: service,
        start_time: Instant::now(),
    });

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/match-groups", post(create_match_group_handler))
        .route(
            "/api/v1/match-groups/members/{member_id}",
            get(list_member_match_groups_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<MatchGroupError> for ApiError {
    fn from(err: MatchGroupError) -> Self {
        match err {
            MatchGroupError::InvalidConfig(e) => ApiError::BadRequest(e.to_string()),
            MatchGroupError::UnknownSkill(_) => ApiError::BadRequest(err.to_string()),
            MatchGroupError::MemberNotFound(_) => {
                ApiError::NotFound("the specified member does not exist".to_string())
            }
            // already logged where they happened
            MatchGroupError::Timeout { .. } | MatchGroupError::Persistence(_) => {
                ApiError::Internal("failed to create the match group".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Request body of `POST /api/v1/match-groups`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchGroupRequest {
    pub match_group_name: String,
    pub description: String,
    pub num_of_members: i64,
    pub department_filter: String,
    pub office_filter: String,
    pub skill_filter: Vec<String>,
    pub never_matched_filter: bool,
}

impl CreateMatchGroupRequest {
    pub fn into_config(self, owner_id: MemberId) -> Result<MatchGroupConfig, ApiError> {
        let num_of_members = validate_member_count(self.num_of_members)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let department_filter = match self.department_filter.as_str() {
            "onlyMyDepartment" => DepartmentFilter::OnlyMyDepartment,
            "excludeMyDepartment" => DepartmentFilter::ExcludeMyDepartment,
            "none" => DepartmentFilter::None,
            _ => {
                return Err(ApiError::BadRequest(
                    "departmentFilter must be 'onlyMyDepartment', 'excludeMyDepartment' or 'none'"
                        .to_string(),
                ))
            }
        };

        let office_filter = match self.office_filter.as_str() {
            "onlyMyOffice" => OfficeFilter::OnlyMyOffice,
            "excludeMyOffice" => OfficeFilter::ExcludeMyOffice,
            "none" => OfficeFilter::None,
            _ => {
                return Err(ApiError::BadRequest(
                    "officeFilter must be 'onlyMyOffice', 'excludeMyOffice' or 'none'".to_string(),
                ))
            }
        };

        Ok(MatchGroupConfig {
            owner_id,
            match_group_name: self.match_group_name,
            description: self.description,
            num_of_members,
            department_filter,
            office_filter,
            skill_filter: self.skill_filter,
            never_matched_filter: self.never_matched_filter,
        })
    }
}

fn authenticated_member(headers: &HeaderMap) -> Result<MemberId, ApiError> {
    let raw = headers
        .get(MEMBER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing member session".to_string()))?;

    MemberId::from_string(raw).map_err(|_| {
        warn!("Rejected malformed {} header", MEMBER_ID_HEADER);
        ApiError::Unauthorized("invalid member session".to_string())
    })
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

async fn create_match_group_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateMatchGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchGroupDetail>), ApiError> {
    let owner_id = authenticated_member(&headers)?;

    let Json(request) = payload.inspect_err(|e| {
        warn!(owner_id = %owner_id, "Malformed match group request: {}", e);
    })?;
    let config = request.into_config(owner_id)?;

    let detail = state
        .match_group_service
        .create_match_group(config, None)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Raw query parameters. Numbers are parsed leniently so that garbage falls
/// back to the defaults instead of failing the request. A blank value such as
/// `?limit=` reads as 0.
#[derive(Debug, Default, Deserialize)]
pub struct ListMatchGroupsParams {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListMatchGroupsParams {
    pub fn normalize(&self) -> ListMatchGroupsQuery {
        let number = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .and_then(|s| if s.is_empty() { Some(0.0) } else { s.parse::<f64>().ok() })
                .filter(|n| n.is_finite())
                .map(|n| n.trunc() as i64)
        };
        ListMatchGroupsQuery::normalize(
            self.status.as_deref(),
            number(&self.limit),
            number(&self.offset),
        )
    }
}

async fn list_member_match_groups_handler(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<String>,
    Query(params): Query<ListMatchGroupsParams>,
) -> Result<Json<Vec<MatchGroupSummary>>, ApiError> {
    let member_id = MemberId::from_string(&member_id)
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a valid member id", member_id)))?;

    let groups = state
        .match_group_service
        .list_member_match_groups(member_id, params.normalize())
        .await
        .map_err(|e| match e {
            MatchGroupError::Persistence(err) => {
                error!(member_id = %member_id, "Failed to list match groups: {}", err);
                ApiError::Internal("failed to list match groups".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(groups))
}
