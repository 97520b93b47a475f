use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use askama::Template;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Errors of the JSON endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ApiErrBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrBody { error: self.to_string() })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        log::error!("db error: {e:?}");
        ApiError::Internal
    }
}

/// Errors that halt an HTML page; rendered as a single inline error block.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Proyecto no encontrado")]
    ProjectNotFound,
    #[error("Acta no encontrada")]
    ActaNotFound,
    #[error("Error: no se pudo acceder al modelo de datos")]
    StoreUnavailable,
    #[error("Error interno del servidor")]
    Internal,
}

#[derive(Template)]
#[template(path = "error_block.html")]
pub struct ErrorBlock<'a> {
    pub message: &'a str,
}

impl ErrorBlock<'_> {
    pub fn to_html(&self) -> String {
        self.render().unwrap_or_else(|e| {
            log::error!("error block render failed: {e}");
            self.message.to_string()
        })
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            PageError::ProjectNotFound | PageError::ActaNotFound => StatusCode::NOT_FOUND,
            PageError::StoreUnavailable | PageError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(ErrorBlock { message: &message }.to_html())
    }
}

impl From<StoreError> for PageError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ActaNotFound => PageError::ActaNotFound,
            e => {
                log::error!("store error: {e:?}");
                PageError::Internal
            }
        }
    }
}

impl From<askama::Error> for PageError {
    fn from(e: askama::Error) -> Self {
        log::error!("template error: {e}");
        PageError::Internal
    }
}
