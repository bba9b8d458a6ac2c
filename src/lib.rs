#[macro_use]
extern crate error_chain;

pub mod article;
pub mod comment;
pub mod cors;
pub mod db;
pub mod endpoints;
pub mod query;
pub mod topic;
pub mod types;
pub mod users;
pub mod utils;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::{catch, catchers, routes, Build, Rocket};

use types::{BAD_REQUEST, INTERNAL, PATH_NOT_FOUND};

fn message(status: Status, message: &str) -> status::Custom<Json<Value>> {
    status::Custom(status, Json(json!({ "message": message })))
}

#[catch(404)]
fn not_found(_req: &Request) -> status::Custom<Json<Value>> {
    message(Status::NotFound, PATH_NOT_FOUND)
}

#[catch(400)]
fn bad_request(_req: &Request) -> status::Custom<Json<Value>> {
    message(Status::BadRequest, BAD_REQUEST)
}

// Rocket answers 422 for JSON bodies whose fields have the wrong type.
#[catch(422)]
fn unprocessable(_req: &Request) -> status::Custom<Json<Value>> {
    message(Status::BadRequest, BAD_REQUEST)
}

#[catch(default)]
fn internal(status: Status, req: &Request) -> status::Custom<Json<Value>> {
    tracing::error!("{} {} failed with {}", req.method(), req.uri(), status);
    message(Status::InternalServerError, INTERNAL)
}

/// The application, ready to launch or to hand to a local test client.
pub fn build(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .attach(cors::Cors)
        .mount("/api", routes![endpoints::catalog, cors::preflight])
        .mount("/api", routes![topic::list, topic::create])
        .mount(
            "/api",
            routes![
                article::list,
                article::get,
                article::create,
                article::update_votes,
            ],
        )
        .mount(
            "/api",
            routes![
                comment::list,
                comment::add,
                comment::delete,
                comment::update_votes,
            ],
        )
        .mount("/api", routes![users::list, users::get])
        .register("/", catchers![not_found, bad_request, unprocessable, internal])
}
