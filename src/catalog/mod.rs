//! Storage of the magazine and plan catalogs.

mod magazines;
mod plans;

pub use magazines::{delete_magazine, get_magazine, insert_magazine, list_magazines, update_magazine};
pub use plans::{delete_plan, get_plan, insert_plan, list_plans, update_plan};

use crate::utils::error_response;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Pagination {
    /// Offset and row limit, clamped to sane bounds.
    pub fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(0, MAX_PAGE_SIZE))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} is still referenced by subscriptions")]
    InUse(&'static str),
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        match self {
            Self::NotFound(_) => error_response(StatusCode::NOT_FOUND, self.to_string()),
            Self::InUse(_) => error_response(StatusCode::CONFLICT, self.to_string()),
            Self::ValidationError(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
