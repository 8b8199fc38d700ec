use crate::{
    app_state::AppState,
    authentication::{
        bearer_token, extract::get_active_user_id, TokenError, TokenPair, TokenType,
    },
    utils::error_response,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Trades a valid refresh token for a new token pair.
#[tracing::instrument(
    name = "Refresh tokens",
    skip(app_state, headers),
    fields(username = tracing::field::Empty)
)]
pub(super) async fn refresh_token(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenPair>, RefreshError> {
    let token = bearer_token(&headers).ok_or(RefreshError::MissingToken)?;
    let claims = app_state
        .token_issuer
        .validate(token, TokenType::Refresh)
        .map_err(RefreshError::InvalidToken)?;

    tracing::Span::current().record("username", &tracing::field::display(&claims.sub));

    get_active_user_id(&app_state.db_pool, &claims.sub)
        .await?
        .ok_or(RefreshError::UnknownUser)?;

    let tokens = app_state
        .token_issuer
        .issue_pair(&claims.sub)
        .map_err(|e| RefreshError::UnexpectedError(e.into()))?;

    Ok(Json(tokens))
}

#[derive(Debug, thiserror::Error)]
pub(super) enum RefreshError {
    #[error("Invalid token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken(#[source] TokenError),
    #[error("User not found")]
    UnknownUser,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
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
