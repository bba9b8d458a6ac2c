use rocket::get;
use rocket::serde::json::Json;
use serde::Serialize;

use crate::db::DbConnection;
use crate::types::ApiResult;

pub mod models;

use self::models::User;

#[derive(Debug, Serialize)]
pub struct UsersContainer {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserContainer {
    user: Vec<User>,
}

#[get("/users")]
pub fn list(mut conn: DbConnection) -> ApiResult<UsersContainer> {
    let users = User::load_all(&mut conn)?;
    Ok(Json(UsersContainer { users }))
}

#[get("/users/<username>")]
pub fn get(mut conn: DbConnection, username: &str) -> ApiResult<UserContainer> {
    let user = User::load_by_name(username, &mut conn)?;
    Ok(Json(UserContainer { user }))
}
