//! Turns raw listing parameters into validated values and SQL text.
//!
//! Column names and sort direction cannot be bound as statement parameters,
//! so they only ever reach the SQL through the `SortBy` and `Order` enums
//! below. Everything else (topic, limit) is bound.

use rocket::FromForm;
use std::str::FromStr;

use crate::types::ApiError;

pub const DEFAULT_LIMIT: i64 = 10;

static SELECT_ARTICLE_SUMMARIES: &str = "SELECT articles.article_id AS article_id,
       articles.title AS title,
       articles.topic AS topic,
       articles.author AS author,
       articles.created_at AS created_at,
       articles.votes AS votes,
       articles.article_img_url AS article_img_url,
       CAST(COUNT(comments.comment_id) AS TEXT) AS comment_count
  FROM articles
  LEFT JOIN comments ON comments.article_id = articles.article_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Title,
    Topic,
    Author,
    #[default]
    CreatedAt,
    Votes,
}

impl SortBy {
    pub fn column(self) -> &'static str {
        match self {
            SortBy::Title => "title",
            SortBy::Topic => "topic",
            SortBy::Author => "author",
            SortBy::CreatedAt => "created_at",
            SortBy::Votes => "votes",
        }
    }
}

impl FromStr for SortBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortBy::Title),
            "topic" => Ok(SortBy::Topic),
            "author" => Ok(SortBy::Author),
            "created_at" => Ok(SortBy::CreatedAt),
            "votes" => Ok(SortBy::Votes),
            _ => Err(ApiError::InvalidQuery),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = ApiError;

    // Only all-lower or all-upper spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ASC" => Ok(Order::Asc),
            "desc" | "DESC" => Ok(Order::Desc),
            _ => Err(ApiError::InvalidQuery),
        }
    }
}

/// A missing limit means `DEFAULT_LIMIT`; a present one must be a
/// non-negative integer.
pub fn parse_limit(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => match raw.parse::<i64>() {
            Ok(limit) if limit >= 0 => Ok(limit),
            _ => Err(ApiError::InvalidQuery),
        },
    }
}

/// Query string of `GET /api/articles`, exactly as the client sent it.
#[derive(Debug, Default, FromForm)]
pub struct ArticleParams {
    pub topic: Option<String>,
    pub order: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListing {
    pub topic: Option<String>,
    pub sort_by: SortBy,
    pub order: Order,
    pub limit: i64,
}

impl ArticleListing {
    /// Checks `order`, `sort_by` and `limit`. Whether `topic` names an
    /// existing topic is left to the caller, which holds the connection.
    pub fn from_params(params: ArticleParams) -> Result<ArticleListing, ApiError> {
        let order = match params.order {
            Some(ref order) => order.parse()?,
            None => Order::default(),
        };
        let sort_by = match params.sort_by {
            Some(ref sort_by) => sort_by.parse()?,
            None => SortBy::default(),
        };
        let limit = parse_limit(params.limit.as_deref())?;

        Ok(ArticleListing {
            topic: params.topic.filter(|topic| !topic.is_empty()),
            sort_by,
            order,
            limit,
        })
    }

    /// Placeholders, in order: the topic (only when filtering), then the limit.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from(SELECT_ARTICLE_SUMMARIES);
        if self.topic.is_some() {
            sql.push_str("\n WHERE articles.topic = ?");
        }
        sql.push_str(&format!(
            "\n GROUP BY articles.article_id\n ORDER BY articles.{} {}\n LIMIT ?",
            self.sort_by.column(),
            self.order.keyword()
        ));
        sql
    }
}
