use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::{select, sql_query};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::schema::topics;
use crate::db::DbConnection;
use crate::types::{ApiCreated, ApiError, ApiResult, Validate};

#[derive(Debug, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

impl Topic {
    pub fn load_all(connection: &mut SqliteConnection) -> Result<Vec<Topic>, ApiError> {
        topics::table
            .select(Topic::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    /// Fails with `TopicNotFound` unless a topic with this slug exists.
    pub fn ensure_exists(slug_: &str, connection: &mut SqliteConnection) -> Result<(), ApiError> {
        use crate::db::schema::topics::dsl::*;
        let found = select(exists(topics.filter(slug.eq(slug_)))).get_result::<bool>(connection)?;
        if found {
            Ok(())
        } else {
            Err(ApiError::TopicNotFound)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopicsContainer {
    topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedTopicContainer {
    posted_topic: Topic,
}

/// Body of `POST /api/topics`. Only `slug` and `description` are read.
#[derive(Debug, Deserialize)]
pub struct NewTopic {
    slug: Option<String>,
    description: Option<String>,
}

impl Validate for NewTopic {
    type Error = ApiError;

    // A missing slug is left for the NOT NULL constraint to reject.
    fn validate(self, _connection: &mut SqliteConnection) -> Result<Self, ApiError> {
        if self.description.is_none() {
            return Err(ApiError::MissingDescription);
        }
        Ok(self)
    }
}

#[get("/topics")]
pub fn list(mut conn: DbConnection) -> ApiResult<TopicsContainer> {
    let topics = Topic::load_all(&mut conn)?;
    Ok(Json(TopicsContainer { topics }))
}

#[post("/topics", data = "<topic>")]
pub fn create(mut conn: DbConnection, topic: Json<NewTopic>) -> ApiCreated<PostedTopicContainer> {
    let topic = topic.validate(&mut conn)?.into_inner();
    debug!("creating topic {:?}", topic.slug);

    let posted_topic = sql_query(
        "INSERT INTO topics (slug, description) VALUES (?, ?) RETURNING slug, description",
    )
    .bind::<Nullable<Text>, _>(topic.slug)
    .bind::<Nullable<Text>, _>(topic.description)
    .get_result::<Topic>(&mut *conn)?;

    Ok((Status::Created, Json(PostedTopicContainer { posted_topic })))
}
