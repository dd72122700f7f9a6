use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use service::link_service::{self, CreateLink, UpdateLink};

use crate::auth::ServerState;
use crate::errors::ApiError;
use crate::routes::IdQuery;

#[utoipa::path(post, path = "/links/create", tag = "links", params(("id" = Uuid, Query, description = "owner user id")), request_body = crate::openapi::CreateLinkRequest, responses((status = 201, description = "Created"), (status = 400, description = "Missing title or link"), (status = 404, description = "Owner not found")))]
pub async fn create_link(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
    Json(input): Json<CreateLink>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let created = link_service::create_link(&state.db, query.id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created, "message": "link created successfully" })),
    ))
}

#[utoipa::path(put, path = "/links/update", tag = "links", params(("id" = Uuid, Query, description = "link id")), request_body = crate::openapi::UpdateLinkRequest, responses((status = 200, description = "Updated"), (status = 404, description = "Link not found")))]
pub async fn update_link(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
    Json(input): Json<UpdateLink>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = link_service::update_link(&state.db, query.id, input).await?;
    Ok(Json(json!({ "success": true, "data": updated, "message": "link updated successfully" })))
}

#[utoipa::path(delete, path = "/links/delete", tag = "links", params(("id" = Uuid, Query, description = "link id")), responses((status = 200, description = "Deleted, owner's highlight cleaned up"), (status = 404, description = "Link not found")))]
pub async fn delete_link(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    link_service::delete_link(&state.db, query.id).await?;
    Ok(Json(json!({ "success": true, "message": "link deleted successfully" })))
}

#[utoipa::path(get, path = "/links/fetch/single", tag = "links", params(("id" = Uuid, Query, description = "link id")), responses((status = 200, description = "Link"), (status = 404, description = "Link not found")))]
pub async fn get_link(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let link = link_service::get_link(&state.db, query.id).await?;
    Ok(Json(json!({ "success": true, "data": link })))
}

#[utoipa::path(get, path = "/links/fetch/all", tag = "links", params(("id" = Uuid, Query, description = "owner user id")), responses((status = 200, description = "Owner's links, newest first"), (status = 404, description = "Owner not found")))]
pub async fn get_all_links(
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let links = link_service::list_links(&state.db, query.id).await?;
    Ok(Json(json!({ "success": true, "data": links })))
}
