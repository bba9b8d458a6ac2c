use lazy_static::lazy_static;
use rocket::get;
use rocket::serde::json::Json;
use serde_json::Value;

lazy_static! {
    static ref ENDPOINTS: Value = serde_json::from_str(include_str!("../endpoints.json"))
        .expect("endpoints.json is valid JSON");
}

/// Static description of every route this API serves.
#[get("/")]
pub fn catalog() -> Json<Value> {
    Json(ENDPOINTS.clone())
}
