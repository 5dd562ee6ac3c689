use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::resources::ReceiveAdapterError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("invalid receive adapter arguments: {0}")]
    InvalidArgs(#[from] ReceiveAdapterError),
    #[error("failed to encode deployment")]
    Encode(#[from] serde_yaml::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgs(_) => StatusCode::BAD_REQUEST,
            AppError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
