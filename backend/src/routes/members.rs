//! User provisioning and member listing endpoints

use crate::error::{ApiError, ApiResult};
use crate::services::members::PageSort;
use crate::services::{MemberService, ProvisioningService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gym_manager_shared::types::{
    MemberDetailResponse, MemberListResponse, MemberResponse, UserCreatedResponse,
};
use serde::Deserialize;
use serde_json::Value;

/// Create user and member routes
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/add-user", post(add_user))
        .route("/members", get(members))
        .route("/users/detail", get(user_detail))
}

/// POST /add-user - Run the provisioning workflow
///
/// The generated password in the response is the only time it is ever
/// returned.
async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserCreatedResponse>)> {
    let provisioned =
        ProvisioningService::create_user(state.store(), state.identity(), &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            status: true,
            message: "User created successfully".to_string(),
            user_id: provisioned.user_id,
            generated_password: provisioned.generated_password,
        }),
    ))
}

/// Query parameters for the member listing endpoint. Parameters are
/// meaningful only when present and non-empty.
#[derive(Debug, Deserialize)]
pub struct MemberListingQuery {
    pub user_id: Option<String>,
    pub gym_name: Option<String>,
    pub last_doc_id: Option<String>,
    pub payments: Option<String>,
    pub birthday: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// GET /members - Single-record lookup or cursor-paginated listing,
/// selected by which query parameter is present
async fn members(
    State(state): State<AppState>,
    Query(query): Query<MemberListingQuery>,
) -> ApiResult<Response> {
    if let Some(user_id) = present(&query.user_id) {
        let user = MemberService::get_member(state.store(), user_id).await?;
        return Ok(Json(MemberResponse {
            status: true,
            message: "User details fetched successfully".to_string(),
            user,
        })
        .into_response());
    }

    if let Some(gym_name) = present(&query.gym_name) {
        let sort = PageSort {
            birthday: present(&query.birthday).is_some(),
            payments: present(&query.payments).is_some(),
        };
        let page = MemberService::list_page(
            state.store(),
            gym_name,
            present(&query.last_doc_id),
            sort,
        )
        .await?;
        let message = if page.members.is_empty() {
            "No more members"
        } else {
            "User details fetched successfully"
        };
        return Ok(Json(MemberListResponse {
            status: true,
            message: message.to_string(),
            members: page.members,
            last_doc_id: page.last_doc_id,
            has_more: page.has_more,
        })
        .into_response());
    }

    Err(ApiError::BadRequest("Invalid request parameters".to_string()))
}

/// Query parameters for the member detail endpoint.
#[derive(Debug, Deserialize)]
pub struct MemberDetailQuery {
    pub user_id: Option<String>,
}

/// GET /users/detail - Full denormalized member profile
async fn user_detail(
    State(state): State<AppState>,
    Query(query): Query<MemberDetailQuery>,
) -> ApiResult<Json<MemberDetailResponse>> {
    let user_id = present(&query.user_id)
        .ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))?;
    let user = MemberService::get_member_detail(state.store(), user_id).await?;
    Ok(Json(MemberDetailResponse {
        status: true,
        message: "User details fetched successfully".to_string(),
        user,
    }))
}
