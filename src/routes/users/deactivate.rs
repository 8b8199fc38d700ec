use super::UserRecord;
use crate::{app_state::AppState, authentication::AuthenticatedUser, utils::error_response};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;

/// Deactivates the caller's own account. The account row is kept.
#[tracing::instrument(skip(app_state, user), fields(user_id = %user.user_id))]
pub(super) async fn deactivate_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<Json<UserRecord>, DeactivateError> {
    if username != user.username {
        return Err(DeactivateError::Forbidden);
    }

    let record = set_inactive(&app_state.db_pool, &username)
        .await?
        .ok_or(DeactivateError::NotFound)?;

    tracing::info!("User `{}` deactivated", record.username);

    Ok(Json(record))
}

#[tracing::instrument(skip(db_pool))]
async fn set_inactive(db_pool: &PgPool, username: &str) -> Result<Option<UserRecord>, anyhow::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET is_active = false
        WHERE username = $1
        RETURNING id, username, email, is_active
        "#,
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await
    .context("Failed to deactivate user")
}

#[derive(Debug, thiserror::Error)]
pub(super) enum DeactivateError {
    #[error("Users can only deactivate their own account")]
    Forbidden,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for DeactivateError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Forbidden => error_response(StatusCode::FORBIDDEN, self.to_string()),
            Self::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
