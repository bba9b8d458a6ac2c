use chrono::NaiveDateTime;
use diesel::delete as diesel_delete;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Nullable, Text};
use rocket::http::Status;
use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::article::ArticleWithCount;
use crate::db::schema::comments;
use crate::db::DbConnection;
use crate::query::parse_limit;
use crate::types::{ApiCreated, ApiError, ApiResult, VoteUpdate, COMMENT_NOT_FOUND, PAGE_NOT_FOUND};
use crate::utils::{parse_id, serialize_timestamp};

static INSERT_COMMENT: &str = "INSERT INTO comments (body, author, article_id)
VALUES (?, ?, ?)
RETURNING comment_id, body, article_id, author, votes, created_at";

#[derive(Debug, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

impl Comment {
    /// Newest first.
    pub fn load_for_article(
        article_id_: i32,
        limit: i64,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Comment>, ApiError> {
        use crate::db::schema::comments::dsl::*;
        comments
            .filter(article_id.eq(article_id_))
            .order(created_at.desc())
            .limit(limit)
            .select(Comment::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    pub fn add_votes(
        id: i32,
        delta: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Comment, ApiError> {
        use crate::db::schema::comments::dsl::*;
        diesel::update(comments.find(id))
            .set(votes.eq(votes + delta))
            .returning(Comment::as_returning())
            .get_result(connection)
            .optional()?
            .ok_or(ApiError::NotFound(COMMENT_NOT_FOUND))
    }

    pub fn remove(id: i32, connection: &mut SqliteConnection) -> Result<(), ApiError> {
        let deleted = diesel_delete(comments::table.find(id)).execute(connection)?;
        if deleted == 0 {
            Err(ApiError::NotFound(PAGE_NOT_FOUND))
        } else {
            Ok(())
        }
    }
}

/// Body of `POST /api/articles/:article_id/comments`. Only `username` and
/// `body` are read; a missing one reaches the store as NULL.
#[derive(Debug, Deserialize)]
pub struct NewComment {
    username: Option<String>,
    body: Option<String>,
}

impl NewComment {
    pub fn insert(
        self,
        article_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Comment, ApiError> {
        sql_query(INSERT_COMMENT)
            .bind::<Nullable<Text>, _>(self.body)
            .bind::<Nullable<Text>, _>(self.username)
            .bind::<Integer, _>(article_id)
            .get_result::<Comment>(connection)
            .map_err(|e| e.into())
    }
}

#[derive(Debug, Serialize)]
pub struct CommentsContainer {
    comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedCommentContainer {
    posted_comment: Comment,
}

#[get("/articles/<article_id>/comments?<limit>")]
pub fn list(
    mut conn: DbConnection,
    article_id: &str,
    limit: Option<&str>,
) -> ApiResult<CommentsContainer> {
    let article_id = parse_id(article_id)?;
    let limit = parse_limit(limit)?;

    // An unknown article is a 404 even though its comment list would just be empty.
    ArticleWithCount::load(article_id, &mut conn)?;
    let comments = Comment::load_for_article(article_id, limit, &mut conn)?;
    Ok(Json(CommentsContainer { comments }))
}

#[post("/articles/<article_id>/comments", data = "<comment>")]
pub fn add(
    mut conn: DbConnection,
    article_id: &str,
    comment: Json<NewComment>,
) -> ApiCreated<PostedCommentContainer> {
    let article_id = parse_id(article_id)?;
    let comment = comment.into_inner();
    debug!("adding comment by {:?} to article {}", comment.username, article_id);
    let posted_comment = comment.insert(article_id, &mut conn)?;
    Ok((Status::Created, Json(PostedCommentContainer { posted_comment })))
}

#[delete("/comments/<comment_id>")]
pub fn delete(mut conn: DbConnection, comment_id: &str) -> Result<NoContent, ApiError> {
    let comment_id = parse_id(comment_id)?;
    Comment::remove(comment_id, &mut conn)?;
    Ok(NoContent)
}

/// Answers the updated comment itself, without an envelope.
#[patch("/comments/<comment_id>", data = "<update>")]
pub fn update_votes(
    mut conn: DbConnection,
    comment_id: &str,
    update: Json<VoteUpdate>,
) -> ApiResult<Comment> {
    let comment_id = parse_id(comment_id)?;
    let delta = update.delta()?;
    let comment = Comment::add_votes(comment_id, delta, &mut conn)?;
    Ok(Json(comment))
}
