use serde::Deserialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Deserialize)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema, Deserialize)]
pub struct RegisterRequest { pub username: String, pub password: String, pub email: String, #[serde(rename = "instagramId")] pub instagram_id: String }

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema, Deserialize)]
pub struct UpdateUserRequest { pub username: Option<String>, pub email: Option<String>, pub password: Option<String> }

#[derive(ToSchema, Deserialize)]
pub struct HighlightRequest { #[serde(rename = "linkId")] pub link_id: Uuid }

#[derive(ToSchema, Deserialize)]
pub struct CreateLinkRequest { pub title: String, pub link: String, pub image: Option<String>, pub thumbnail: Option<String> }

#[derive(ToSchema, Deserialize)]
pub struct UpdateLinkRequest { pub title: Option<String>, pub link: Option<String>, pub image: Option<String>, pub thumbnail: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::logout,
        crate::routes::users::delete_user,
        crate::routes::users::update_user,
        crate::routes::users::get_all_users,
        crate::routes::users::highlight,
        crate::routes::users::get_user_by_token,
        crate::routes::links::create_link,
        crate::routes::links::update_link,
        crate::routes::links::delete_link,
        crate::routes::links::get_link,
        crate::routes::links::get_all_links,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UpdateUserRequest,
            HighlightRequest,
            CreateLinkRequest,
            UpdateLinkRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "links")
    )
)]
pub struct ApiDoc;
