use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::AuthError;
use service::user_service;

use crate::auth::ServerState;
use crate::errors::ApiError;
use crate::routes::IdQuery;

#[derive(Debug, Deserialize)]
pub struct HighlightInput {
    #[serde(rename = "linkId")]
    pub link_id: Uuid,
}

#[utoipa::path(post, path = "/users/register", tag = "users", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Missing field or duplicate username/email")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    state.auth_service().register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "user registered successfully" })),
    ))
}

#[utoipa::path(post, path = "/users/login", tag = "users", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Bad credentials or suspended account")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let session = state.auth_service().login(input).await?;

    let mut cookie = Cookie::new("auth_token", session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "user logged in successfully",
            "data": {
                "id": session.user.id,
                "name": session.user.username,
                "username": session.user.username,
                "token": session.token,
            },
        })),
    ))
}

/// Tokens are not revoked server-side; logout only clears the cookie.
#[utoipa::path(post, path = "/users/logout", tag = "users", responses((status = 200, description = "Logged out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, Json(json!({ "success": true, "message": "logged out successfully" })))
}

#[utoipa::path(delete, path = "/users/delete", tag = "users", params(("id" = Uuid, Query, description = "user id")), responses((status = 200, description = "Suspended"), (status = 400, description = "Already suspended"), (status = 404, description = "User not found")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user_service::suspend(&state.db, query.id).await?;
    Ok(Json(json!({ "success": true, "message": "account suspended successfully" })))
}

#[utoipa::path(put, path = "/users/update", tag = "users", params(("id" = Uuid, Query, description = "user id")), request_body = crate::openapi::UpdateUserRequest, responses((status = 200, description = "Updated"), (status = 404, description = "User not found")))]
pub async fn update_user(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
    Json(input): Json<user_service::UpdateProfile>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = user_service::update_profile(&state.db, query.id, input).await?;
    Ok(Json(json!({
        "success": true,
        "message": "user details updated successfully",
        "data": updated,
    })))
}

#[utoipa::path(get, path = "/users/all", tag = "users", responses((status = 200, description = "All users, password hashes excluded")))]
pub async fn get_all_users(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let users = user_service::get_all_users(&state.db).await?;
    Ok(Json(json!({ "success": true, "data": users })))
}

#[utoipa::path(put, path = "/users/highlight", tag = "users", params(("id" = Uuid, Query, description = "user id")), request_body = crate::openapi::HighlightRequest, responses((status = 200, description = "Toggled"), (status = 400, description = "Highlight set is full"), (status = 404, description = "User or link not found")))]
pub async fn highlight(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
    Json(input): Json<HighlightInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (outcome, link) =
        user_service::toggle_highlight(&state.db, query.id, input.link_id).await?;
    let message = match outcome {
        user_service::HighlightOutcome::Added => "link added successfully",
        user_service::HighlightOutcome::Removed => "link removed successfully",
    };
    // Wire name kept from the original API: the toggled link rides under
    // a top-level `link` key, not the usual `data`.
    Ok(Json(json!({ "success": true, "message": message, "link": link })))
}

/// Identity lookup from a raw token in the Authorization header. The
/// original API sends the bare token; a `Bearer ` prefix is tolerated.
#[utoipa::path(get, path = "/users/user", tag = "users", responses((status = 200, description = "Current user"), (status = 401, description = "Missing or invalid token")))]
pub async fn get_user_by_token(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AuthError::TokenError("no token provided".into()))?;
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let auth_user = state.auth_service().verify_token(token).await?;
    // Full record, highlighted set included; the hash never serializes.
    let user = user_service::get_user(&state.db, auth_user.id).await?;
    Ok(Json(json!({ "success": true, "message": "welcome back", "user": user })))
}
