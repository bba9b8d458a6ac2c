use chrono::NaiveDateTime;
use diesel::connection::SimpleConnection;
use diesel::insert_into;
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::schema::{articles, comments, topics, users};
use super::{migrate, Error, Result};
use crate::utils::deserialize_millis;

static TEST_TOPICS: &str = include_str!("../../db/data/test/topics.json");
static TEST_USERS: &str = include_str!("../../db/data/test/users.json");
static TEST_ARTICLES: &str = include_str!("../../db/data/test/articles.json");
static TEST_COMMENTS: &str = include_str!("../../db/data/test/comments.json");

static DROP_TABLES: &str = "DROP TABLE IF EXISTS comments;
DROP TABLE IF EXISTS articles;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS topics;";

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = topics)]
pub struct SeedTopic {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = users)]
pub struct SeedUser {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = articles)]
pub struct SeedArticle {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(deserialize_with = "deserialize_millis")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub votes: i32,
    pub article_img_url: String,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = comments)]
pub struct SeedComment {
    pub body: String,
    pub article_id: i32,
    pub author: String,
    #[serde(default)]
    pub votes: i32,
    #[serde(deserialize_with = "deserialize_millis")]
    pub created_at: NaiveDateTime,
}

/// Rows to load into an empty database. Articles and comments get their ids
/// from insertion order, so `SeedComment::article_id` refers to the position
/// (starting at 1) of an article in `articles`.
#[derive(Debug, Default)]
pub struct SeedData {
    pub topics: Vec<SeedTopic>,
    pub users: Vec<SeedUser>,
    pub articles: Vec<SeedArticle>,
    pub comments: Vec<SeedComment>,
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}

impl SeedData {
    /// The fixture the integration tests run against.
    pub fn test() -> Result<SeedData> {
        SeedData::from_json(TEST_TOPICS, TEST_USERS, TEST_ARTICLES, TEST_COMMENTS)
    }

    pub fn from_json(
        topics: &str,
        users: &str,
        articles: &str,
        comments: &str,
    ) -> Result<SeedData> {
        Ok(SeedData {
            topics: parse(topics)?,
            users: parse(users)?,
            articles: parse(articles)?,
            comments: parse(comments)?,
        })
    }

    /// Reads `topics.json`, `users.json`, `articles.json` and `comments.json`
    /// from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<SeedData> {
        let dir = dir.as_ref();
        let read = |name: &str| fs::read_to_string(dir.join(name));
        SeedData::from_json(
            &read("topics.json")?,
            &read("users.json")?,
            &read("articles.json")?,
            &read("comments.json")?,
        )
    }
}

/// Drops every table, recreates the schema and inserts `data`, all in one
/// transaction.
pub fn seed(conn: &mut SqliteConnection, data: &SeedData) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        conn.batch_execute(DROP_TABLES)?;
        migrate(conn)?;

        for topic in &data.topics {
            insert_into(topics::table).values(topic).execute(conn)?;
        }
        for user in &data.users {
            insert_into(users::table).values(user).execute(conn)?;
        }
        for article in &data.articles {
            insert_into(articles::table).values(article).execute(conn)?;
        }
        for comment in &data.comments {
            insert_into(comments::table).values(comment).execute(conn)?;
        }
        Ok(())
    })?;

    info!(
        "seeded {} topics, {} users, {} articles, {} comments",
        data.topics.len(),
        data.users.len(),
        data.articles.len(),
        data.comments.len()
    );
    Ok(())
}
