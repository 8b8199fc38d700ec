use crate::app_state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use deactivate::deactivate_user;
use login::login;
use password::change_password;
use profile::profile;
use refresh::refresh_token;
use register::register;
use serde::Serialize;

mod deactivate;
mod login;
mod password;
mod profile;
mod refresh;
mod register;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/token/refresh", post(refresh_token))
        .route("/users/me", get(profile))
        .route("/users/me/password", put(change_password))
        .route("/users/deactivate/:username", delete(deactivate_user))
}

#[derive(Debug, Serialize, sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
}
