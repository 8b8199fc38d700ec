use crate::{
    app_state::AppState,
    authentication::{
        change_password as auth_change_password, validate_credentials, AuthError,
        AuthenticatedUser, Credentials,
    },
    domain::NewPassword,
    utils::error_response,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[tracing::instrument(skip(app_state, user, body), fields(user_id = %user.user_id))]
pub(super) async fn change_password(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<PasswordBody>,
) -> Result<StatusCode, PasswordError> {
    if body.new_password.expose_secret() != body.new_password_check.expose_secret() {
        return Err(PasswordError::Mismatch);
    }

    let credentials = Credentials {
        username: user.username,
        password: body.current_password,
    };

    if let Err(e) = validate_credentials(&app_state.db_pool, credentials).await {
        return match e {
            AuthError::InvalidCredentials(_) => Err(PasswordError::WrongPassword),
            AuthError::UnexpectedError(e) => Err(PasswordError::UnexpectedError(e)),
        };
    }

    let new_password =
        NewPassword::parse(body.new_password).map_err(PasswordError::ValidationError)?;

    auth_change_password(&app_state.db_pool, user.user_id, new_password.into_secret()).await?;

    tracing::info!("Password changed");

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub(super) struct PasswordBody {
    current_password: Secret<String>,
    new_password: Secret<String>,
    new_password_check: Secret<String>,
}

#[derive(Debug, thiserror::Error)]
pub(super) enum PasswordError {
    #[error("You have entered two different new passwords - the field values must match.")]
    Mismatch,
    #[error("The current password is incorrect.")]
    WrongPassword,
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for PasswordError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::Mismatch | Self::WrongPassword => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::ValidationError(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
