use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};
use diesel::sqlite::Sqlite;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, patch, post};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::schema::{articles, comments};
use crate::db::DbConnection;
use crate::query::{ArticleListing, ArticleParams};
use crate::topic::Topic;
use crate::types::{ApiCreated, ApiError, ApiResult, VoteUpdate, PAGE_NOT_FOUND};
use crate::utils::{parse_id, serialize_timestamp};

pub const DEFAULT_ARTICLE_IMG_URL: &str =
    "https://www.pulsecarshalton.co.uk/wp-content/uploads/2016/08/jk-placeholder-image.jpg";

static SELECT_ARTICLE_WITH_COUNT: &str = "SELECT articles.article_id AS article_id,
       articles.title AS title,
       articles.topic AS topic,
       articles.author AS author,
       articles.body AS body,
       articles.created_at AS created_at,
       articles.votes AS votes,
       articles.article_img_url AS article_img_url,
       CAST(COUNT(comments.comment_id) AS TEXT) AS comment_count
  FROM articles
  LEFT JOIN comments ON comments.article_id = articles.article_id
 WHERE articles.article_id = ?
 GROUP BY articles.article_id";

static INSERT_ARTICLE: &str = "INSERT INTO articles (author, title, body, topic, article_img_url)
VALUES (?, ?, ?, ?, ?)
RETURNING article_id, title, topic, author, body, created_at, votes, article_img_url";

#[derive(Debug, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = articles)]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
    pub article_img_url: String,
}

/// A full article plus the number of comments on it. The count is text, the
/// way the aggregate comes out of the projection.
#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleWithCount {
    #[diesel(embed)]
    #[serde(flatten)]
    pub article: Article,
    #[diesel(sql_type = Text)]
    pub comment_count: String,
}

/// Listing row: everything but the body.
#[derive(Debug, QueryableByName, Serialize)]
#[diesel(table_name = articles)]
pub struct ArticleSummary {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
    pub article_img_url: String,
    #[diesel(sql_type = Text)]
    pub comment_count: String,
}

impl Article {
    /// `votes = votes + delta`, applied by the store. No clamping.
    pub fn add_votes(
        id: i32,
        delta: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Article, ApiError> {
        use crate::db::schema::articles::dsl::*;
        diesel::update(articles.find(id))
            .set(votes.eq(votes + delta))
            .returning(Article::as_returning())
            .get_result(connection)
            .optional()?
            .ok_or(ApiError::NotFound(PAGE_NOT_FOUND))
    }
}

impl ArticleWithCount {
    pub fn load(id: i32, connection: &mut SqliteConnection) -> Result<ArticleWithCount, ApiError> {
        sql_query(SELECT_ARTICLE_WITH_COUNT)
            .bind::<Integer, _>(id)
            .get_result::<ArticleWithCount>(connection)
            .optional()?
            .ok_or(ApiError::NotFound(PAGE_NOT_FOUND))
    }
}

impl ArticleSummary {
    /// Runs the topic existence check first when the listing filters by
    /// topic, so an unknown topic is told apart from an empty one.
    pub fn load(
        listing: &ArticleListing,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<ArticleSummary>, ApiError> {
        if let Some(ref topic) = listing.topic {
            Topic::ensure_exists(topic, connection)?;
        }

        let mut query = sql_query(listing.to_sql()).into_boxed::<Sqlite>();
        if let Some(ref topic) = listing.topic {
            query = query.bind::<Text, _>(topic.clone());
        }
        query
            .bind::<BigInt, _>(listing.limit)
            .load::<ArticleSummary>(connection)
            .map_err(|e| e.into())
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleContainer<T> {
    article: T,
}

#[derive(Debug, Serialize)]
pub struct ArticlesContainer {
    articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedArticleContainer {
    posted_article: ArticleWithCount,
}

/// Body of `POST /api/articles`. Missing required fields are passed on as
/// NULL and rejected by the store.
#[derive(Debug, Deserialize)]
pub struct NewArticle {
    author: Option<String>,
    title: Option<String>,
    body: Option<String>,
    topic: Option<String>,
    article_img_url: Option<String>,
}

impl NewArticle {
    pub fn insert(self, connection: &mut SqliteConnection) -> Result<ArticleWithCount, ApiError> {
        let article_img_url = self
            .article_img_url
            .unwrap_or_else(|| DEFAULT_ARTICLE_IMG_URL.to_string());
        let article = sql_query(INSERT_ARTICLE)
            .bind::<Nullable<Text>, _>(self.author)
            .bind::<Nullable<Text>, _>(self.title)
            .bind::<Nullable<Text>, _>(self.body)
            .bind::<Nullable<Text>, _>(self.topic)
            .bind::<Text, _>(article_img_url)
            .get_result::<Article>(connection)?;

        let comment_count = comments::table
            .filter(comments::article_id.eq(article.article_id))
            .count()
            .get_result::<i64>(connection)?;

        Ok(ArticleWithCount {
            article,
            comment_count: comment_count.to_string(),
        })
    }
}

#[get("/articles?<params..>")]
pub fn list(mut conn: DbConnection, params: ArticleParams) -> ApiResult<ArticlesContainer> {
    debug!("listing articles with {:?}", params);
    let listing = ArticleListing::from_params(params)?;
    let articles = ArticleSummary::load(&listing, &mut conn)?;
    Ok(Json(ArticlesContainer { articles }))
}

#[get("/articles/<article_id>")]
pub fn get(
    mut conn: DbConnection,
    article_id: &str,
) -> ApiResult<ArticleContainer<ArticleWithCount>> {
    let article_id = parse_id(article_id)?;
    let article = ArticleWithCount::load(article_id, &mut conn)?;
    Ok(Json(ArticleContainer { article }))
}

#[post("/articles", data = "<article>")]
pub fn create(
    mut conn: DbConnection,
    article: Json<NewArticle>,
) -> ApiCreated<PostedArticleContainer> {
    let article = article.into_inner();
    debug!("creating article {:?} by {:?}", article.title, article.author);
    let posted_article = article.insert(&mut conn)?;
    Ok((Status::Created, Json(PostedArticleContainer { posted_article })))
}

#[patch("/articles/<article_id>", data = "<update>")]
pub fn update_votes(
    mut conn: DbConnection,
    article_id: &str,
    update: Json<VoteUpdate>,
) -> ApiResult<ArticleContainer<Article>> {
    let article_id = parse_id(article_id)?;
    let delta = update.delta()?;
    let article = Article::add_votes(article_id, delta, &mut conn)?;
    Ok(Json(ArticleContainer { article }))
}
