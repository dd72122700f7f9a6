pub mod links;
pub mod users;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use common::types::Health;

use crate::auth::{self, ServerState};

/// Entity id passed as a query parameter, the original API's convention.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public user/link routes plus the
/// token-gated user-management routes.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route("/users/user", get(users::get_user_by_token))
        .route("/links/create", post(links::create_link))
        .route("/links/update", put(links::update_link))
        .route("/links/delete", delete(links::delete_link))
        .route("/links/fetch/single", get(links::get_link))
        .route("/links/fetch/all", get(links::get_all_links));

    // Protected routes: a verified token populates AuthContext first
    let protected = Router::new()
        .route("/users/delete", delete(users::delete_user))
        .route("/users/update", put(users::update_user))
        .route("/users/all", get(users::get_all_users))
        .route("/users/highlight", put(users::highlight))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
