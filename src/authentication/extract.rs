use super::token::{TokenError, TokenType};
use crate::{app_state::AppState, utils::error_response};
use anyhow::Context;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::{PgPool, Row};

/// The active user named by a valid access token in the `Authorization` header.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthenticationError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthenticationError::MissingToken)?;
        let claims = state.token_issuer.validate(token, TokenType::Access)?;

        let user_id = get_active_user_id(&state.db_pool, &claims.sub)
            .await?
            .ok_or(AuthenticationError::UnknownUser)?;

        tracing::info!("User id `{user_id}` authenticated");

        Ok(Self {
            user_id,
            username: claims.sub,
        })
    }
}

/// Extracts the credentials of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

#[tracing::instrument(name = "Get active user id", skip(db_pool))]
pub async fn get_active_user_id(
    db_pool: &PgPool,
    username: &str,
) -> Result<Option<i64>, anyhow::Error> {
    let row = sqlx::query(
        r#"
        SELECT id
        FROM users
        WHERE username = $1 AND is_active
        "#,
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await
    .context("Failed to perform a query to retrieve a user id")?;

    row.map(|row| row.try_get("id"))
        .transpose()
        .context("Failed to read user id")
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Not authenticated")]
    MissingToken,
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    #[error("User not found")]
    UnknownUser,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::UnexpectedError(_) | Self::InvalidToken(TokenError::Signing(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            _ => {
                let mut response = error_response(StatusCode::UNAUTHORIZED, self.to_string());
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
        }
    }
}
