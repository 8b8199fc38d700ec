use super::UserRecord;
use crate::{
    app_state::AppState,
    authentication::hash_password,
    domain::{NewPassword, NewUser, UserEmail, Username},
    utils::{error_response, is_unique_violation},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::PgPool;

#[tracing::instrument(
    name = "Registering a new user",
    skip(app_state, body),
    fields(username = tracing::field::Empty, email = tracing::field::Empty)
)]
pub(super) async fn register(
    State(app_state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserRecord>), RegisterError> {
    tracing::Span::current()
        .record("username", &tracing::field::display(&body.username))
        .record("email", &tracing::field::display(&body.email));

    let NewUser {
        username,
        email,
        password,
    } = body.try_into().map_err(RegisterError::ValidationError)?;

    let password_hash = hash_password(password.into_secret()).await?;
    let user = insert_user(&app_state.db_pool, &username, &email, password_hash).await?;

    tracing::info!("User `{}` registered with id `{}`", user.username, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Deserialize)]
pub(super) struct RegisterBody {
    username: String,
    email: String,
    password: Secret<String>,
}

impl TryFrom<RegisterBody> for NewUser {
    type Error = String;

    fn try_from(body: RegisterBody) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::parse(body.username)?,
            email: UserEmail::parse(body.email)?,
            password: NewPassword::parse(body.password)?,
        })
    }
}

#[tracing::instrument(name = "Saving new user", skip_all)]
async fn insert_user(
    db_pool: &PgPool,
    username: &Username,
    email: &UserEmail,
    password_hash: Secret<String>,
) -> Result<UserRecord, RegisterError> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, is_active
        "#,
    )
    .bind(username.as_ref())
    .bind(email.as_ref())
    .bind(password_hash.expose_secret())
    .fetch_one(db_pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RegisterError::AlreadyRegistered
        } else {
            RegisterError::UnexpectedError(anyhow::Error::new(e).context("Failed to insert user"))
        }
    })
}

#[derive(Debug, thiserror::Error)]
pub(super) enum RegisterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("User already registered")]
    AlreadyRegistered,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::ValidationError(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Self::AlreadyRegistered => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
