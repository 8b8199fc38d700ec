use crate::{
    app_state::AppState,
    authentication::{validate_credentials, AuthError, Credentials, TokenError, TokenPair},
    utils::error_response,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::Secret;
use serde::Deserialize;

#[tracing::instrument(
    skip(app_state, body),
    fields(username = tracing::field::Empty, user_id = tracing::field::Empty)
)]
pub(super) async fn login(
    State(app_state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<TokenPair>, LoginError> {
    tracing::Span::current().record("username", &tracing::field::display(&body.username));

    let username = body.username.clone();
    let user_id = validate_credentials(
        &app_state.db_pool,
        Credentials {
            username: body.username,
            password: body.password,
        },
    )
    .await
    .map_err(|e| match e {
        AuthError::InvalidCredentials(_) => LoginError::AuthError(e.into()),
        AuthError::UnexpectedError(_) => LoginError::UnexpectedError(e.into()),
    })?;

    tracing::Span::current().record("user_id", &tracing::field::display(&user_id));

    let tokens = app_state.token_issuer.issue_pair(&username)?;

    Ok(Json(tokens))
}

#[derive(Deserialize)]
pub(super) struct LoginBody {
    username: String,
    password: Secret<String>,
}

#[derive(Debug, thiserror::Error)]
pub(super) enum LoginError {
    #[error("Invalid credentials")]
    AuthError(#[source] anyhow::Error),
    #[error("Failed to issue tokens")]
    TokenError(#[from] TokenError),
    #[error("Something went wrong")]
    UnexpectedError(#[source] anyhow::Error),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::AuthError(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::TokenError(_) | Self::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
