use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Duration;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::Claims;
use service::auth::{AuthConfig, AuthError, AuthService};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: u64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// Build the auth service over the shared connection.
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        let cfg = AuthConfig::new(self.auth.jwt_secret.clone())
            .with_ttl(Duration::hours(self.auth.token_ttl_hours as i64));
        AuthService::new(repo, cfg)
    }
}

/// Per-request caller identity, populated by `require_auth`.
/// No process-wide identity state; handlers read it from extensions.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Gate for protected routes: validates `Authorization: Bearer <token>`,
/// falling back to the `auth_token` cookie set at login. Missing token is
/// 400, malformed or expired is 401; either way the rejection carries the
/// same `{"success": false, "message": ...}` body as the handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(AuthError::TokenError("invalid authorization format".into()).into());
            }
            h[prefix.len()..].to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(AuthError::Validation("no token provided".into()).into());
                }
            }
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            let user_id = Uuid::parse_str(&data.claims.sub).map_err(|e| {
                tracing::error!(path = %path, err = %e, "token subject is not a user id");
                ApiError::from(AuthError::TokenError("invalid token subject".into()))
            })?;
            req.extensions_mut().insert(AuthContext { user_id });
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(AuthError::TokenError(e.to_string()).into())
        }
    }
}
