use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::utils::try_respond;

pub const BAD_REQUEST: &str = "400 - Bad request";
pub const INVALID_QUERY: &str = "Invalid Query";
pub const MISSING_DESCRIPTION: &str = "Please add a description!";
pub const FOREIGN_KEY_NOT_FOUND: &str = "404 - Not Found";
pub const TOPIC_NOT_FOUND: &str = "404- Topic Not Found";
pub const PAGE_NOT_FOUND: &str = "Page not found";
pub const COMMENT_NOT_FOUND: &str = "Comment ID not found";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const PATH_NOT_FOUND: &str = "404 - Path not found";
pub const INTERNAL: &str = "500 - Internal server error";

pub trait Validate
where
    Self: Sized,
{
    type Error;
    fn validate(self, connection: &mut SqliteConnection) -> Result<Self, Self::Error>;
}

#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by the store; classified by `DatabaseErrorKind`.
    Diesel(DieselError),
    /// An identifier or vote delta that is not an integer.
    BadRequest,
    /// `order`, `sort_by` or `limit` outside what the listing accepts.
    InvalidQuery,
    TopicNotFound,
    /// Explicit rejection with an endpoint specific message.
    NotFound(&'static str),
    MissingDescription,
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub type ApiCreated<T> = Result<(Status, Json<T>), ApiError>;

impl ApiError {
    pub fn status_and_message(&self) -> (Status, &'static str) {
        match self {
            ApiError::Diesel(error) => match error {
                DieselError::NotFound => (Status::NotFound, PAGE_NOT_FOUND),
                DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _) => {
                    (Status::BadRequest, BAD_REQUEST)
                }
                // Vote counters leaving the 32-bit range.
                DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
                    (Status::BadRequest, BAD_REQUEST)
                }
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    (Status::NotFound, FOREIGN_KEY_NOT_FOUND)
                }
                _ => (Status::InternalServerError, INTERNAL),
            },
            ApiError::BadRequest => (Status::BadRequest, BAD_REQUEST),
            ApiError::InvalidQuery => (Status::BadRequest, INVALID_QUERY),
            ApiError::TopicNotFound => (Status::NotFound, TOPIC_NOT_FOUND),
            ApiError::NotFound(message) => (Status::NotFound, *message),
            ApiError::MissingDescription => (Status::BadRequest, MISSING_DESCRIPTION),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = self.status_and_message();
        if status == Status::InternalServerError {
            error!("{} {} failed: {:?}", req.method(), req.uri(), self);
        } else {
            warn!("{} {} rejected with {}: {}", req.method(), req.uri(), status.code, message);
        }
        try_respond(req, json!({ "message": message }), status)
    }
}

/// Body of the vote PATCH routes. `inc_votes` stays untyped until `delta`
/// so that a wrong type is answered like any other bad request.
#[derive(Debug, Deserialize)]
pub struct VoteUpdate {
    inc_votes: Option<Value>,
}

impl VoteUpdate {
    /// Integers and integer strings are accepted; anything else, including a
    /// missing `inc_votes`, is a bad request.
    pub fn delta(&self) -> Result<i32, ApiError> {
        match self.inc_votes {
            Some(Value::Number(ref n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or(ApiError::BadRequest),
            Some(Value::String(ref s)) => {
                s.trim().parse::<i32>().map_err(|_| ApiError::BadRequest)
            }
            _ => Err(ApiError::BadRequest),
        }
    }
}

impl<T> Validate for Json<T>
where
    T: Validate,
{
    type Error = <T as Validate>::Error;
    fn validate(self, connection: &mut SqliteConnection) -> Result<Self, Self::Error> {
        let inner = self.into_inner();
        let validated = inner.validate(connection)?;
        Ok(Json(validated))
    }
}
