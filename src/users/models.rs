use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::users;
use crate::types::{ApiError, USER_NOT_FOUND};

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn load_all(connection: &mut SqliteConnection) -> Result<Vec<User>, ApiError> {
        users::table
            .select(User::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    /// Exact match on `username`. The rows come back as a list, which is
    /// what `GET /api/users/:username` sends.
    pub fn load_by_name(
        name_: &str,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<User>, ApiError> {
        use crate::db::schema::users::dsl::*;
        let found = users
            .filter(username.eq(name_))
            .select(User::as_select())
            .load(connection)?;
        if found.is_empty() {
            Err(ApiError::NotFound(USER_NOT_FOUND))
        } else {
            Ok(found)
        }
    }
}
