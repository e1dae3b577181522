use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// The only failures the API reports. Each one renders a fixed JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable entity")]
    UnprocessableEntity,
    #[error("internal server error")]
    InternalServerError,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "The server will not process the request due to something that is perceived to be a client error (e.g., malformed request syntax, invalid request message framing, or deceptive request routing).",
            ApiError::NotFound => "The server can not find the requested resource.",
            ApiError::MethodNotAllowed => "The request method is known by the server but is not supported by the target resource.",
            ApiError::UnprocessableEntity => "The request was well-formed but was unable to be followed due to semantic errors.",
            ApiError::InternalServerError => "The server has encountered a situation it does not know how to handle.",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        tracing::error!("Storage failure: {error}");
        ApiError::InternalServerError
    }
}

/// A JSON body that parsed but does not fit the typed request it was meant for.
#[derive(Debug, thiserror::Error)]
#[error("invalid request body: {0}")]
pub struct ValidationError(#[from] serde_json::Error);

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> ApiError {
        tracing::warn!("{error}");
        ApiError::InternalServerError
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> ApiError {
        tracing::warn!("Rejected JSON body: {rejection}");
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::InternalServerError,
            _ => ApiError::BadRequest,
        }
    }
}

// A path segment that is not a non-negative integer means the route does not exist.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> ApiError {
        tracing::info!("Rejected path: {rejection}");
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> ApiError {
        tracing::warn!("Rejected query string: {rejection}");
        ApiError::BadRequest
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct RouteParam<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
