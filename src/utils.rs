use chrono::{DateTime, NaiveDateTime, SecondsFormat};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use serde::de::{self, Deserialize, Deserializer};
use serde::Serializer;
use serde_json::Value;

use crate::types::ApiError;

pub fn try_respond(req: &Request<'_>, json: Value, status: Status) -> response::Result<'static> {
    let response = Json(json).respond_to(req)?;
    Response::build_from(response).status(status).ok()
}

/// Stored timestamps are UTC; they go out as `2020-07-09T20:11:00.000Z`.
pub fn serialize_timestamp<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

/// Epoch milliseconds, as used by the seed files.
pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = i64::deserialize(deserializer)?;
    DateTime::from_timestamp_millis(millis)
        .map(|date| date.naive_utc())
        .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", millis)))
}

/// Path identifiers arrive as raw segments; anything that is not an integer
/// is a bad request rather than an unmatched route.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::BadRequest)
}
