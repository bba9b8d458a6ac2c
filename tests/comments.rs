mod common;

use common::{app, is_descending, message, strings};
use rocket::http::Status;
use serde_json::json;

#[test]
fn comments_for_article_are_newest_first_and_capped_at_ten() {
    let app = app();
    let (status, body) = app.get("/api/articles/1/comments");
    assert_eq!(status, Status::Ok);

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 10);
    for comment in comments {
        assert!(comment["comment_id"].is_number());
        assert!(comment["body"].is_string());
        assert_eq!(comment["article_id"], 1);
        assert!(comment["author"].is_string());
        assert!(comment["votes"].is_number());
        assert!(comment["created_at"].is_string());
    }
    assert!(is_descending(&strings(&body["comments"], "created_at")));
    assert_eq!(comments[0]["comment_id"], 5);
}

#[test]
fn comments_respect_limit() {
    let app = app();
    let (status, body) = app.get("/api/articles/1/comments?limit=4");
    assert_eq!(status, Status::Ok);
    assert_eq!(body["comments"].as_array().unwrap().len(), 4);

    let (_, body) = app.get("/api/articles/1/comments?limit=50");
    assert_eq!(body["comments"].as_array().unwrap().len(), 11);
}

#[test]
fn comments_reject_non_numeric_limit() {
    let app = app();
    let (status, body) = app.get("/api/articles/1/comments?limit=bananas");
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "Invalid Query");
}

#[test]
fn comments_for_article_without_any_is_empty() {
    let app = app();
    let (status, body) = app.get("/api/articles/2/comments");
    assert_eq!(status, Status::Ok);
    assert_eq!(body["comments"], json!([]));
}

#[test]
fn comments_for_missing_article_is_404() {
    let app = app();
    let (status, body) = app.get("/api/articles/2986/comments");
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "Page not found");
}

#[test]
fn comments_for_malformed_article_id_is_400() {
    let app = app();
    let (status, body) = app.get("/api/articles/banana/comments");
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");
}

#[test]
fn post_comment_returns_created_row() {
    let app = app();
    let (status, body) = app.post(
        "/api/articles/4/comments",
        &json!({ "username": "butter_bridge", "body": "hello world" }),
    );
    assert_eq!(status, Status::Created);

    let posted = &body["postedComment"];
    assert_eq!(posted["comment_id"], 19);
    assert_eq!(posted["author"], "butter_bridge");
    assert_eq!(posted["body"], "hello world");
    assert_eq!(posted["article_id"], 4);
    assert_eq!(posted["votes"], 0);
    assert!(posted["created_at"].is_string());

    let (_, body) = app.get("/api/articles/4/comments");
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/articles/4");
    assert_eq!(body["article"]["comment_count"], "1");
}

#[test]
fn post_comment_drops_extra_fields() {
    let app = app();
    let (status, body) = app.post(
        "/api/articles/4/comments",
        &json!({ "username": "butter_bridge", "body": "hello world", "banana": "ignore this" }),
    );
    assert_eq!(status, Status::Created);
    assert!(body["postedComment"].get("banana").is_none());
}

#[test]
fn post_comment_rejections() {
    let app = app();
    let comment = json!({ "username": "butter_bridge", "body": "hello world" });

    let (status, body) = app.post("/api/articles/banana/comments", &comment);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");

    let (status, body) = app.post("/api/articles/999/comments", &comment);
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "404 - Not Found");

    let (status, body) = app.post(
        "/api/articles/5/comments",
        &json!({ "username": "butter_bridge" }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");

    let (status, body) = app.post(
        "/api/articles/5/comments",
        &json!({ "username": "john", "body": "oi oi" }),
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "404 - Not Found");

    let (_, body) = app.get("/api/articles/5");
    assert_eq!(body["article"]["comment_count"], "2");
}

#[test]
fn delete_comment_answers_no_content_once() {
    let app = app();
    let response = app.client.delete("/api/comments/3").dispatch();
    assert_eq!(response.status(), Status::NoContent);
    assert!(response.into_string().unwrap_or_default().is_empty());

    let (status, body) = common::json_of(app.client.delete("/api/comments/3").dispatch());
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "Page not found");

    let (_, body) = app.get("/api/articles/1");
    assert_eq!(body["article"]["comment_count"], "10");
}

#[test]
fn delete_comment_rejections() {
    let app = app();
    let (status, body) = common::json_of(app.client.delete("/api/comments/999").dispatch());
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "Page not found");

    let (status, body) = common::json_of(app.client.delete("/api/comments/banana").dispatch());
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");
}

#[test]
fn patch_comment_votes_answers_bare_comment() {
    let app = app();
    let (status, body) = app.patch("/api/comments/3", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["comment_id"], 3);
    assert_eq!(body["votes"], 101);

    let (_, body) = app.patch("/api/comments/3", &json!({ "inc_votes": -201 }));
    assert_eq!(body["votes"], -100);
}

#[test]
fn patch_comment_votes_past_32_bits_is_400() {
    let app = app();
    let (status, body) = app.patch("/api/comments/3", &json!({ "inc_votes": -2147483647 }));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["votes"], -2147483547i64);

    let (status, body) = app.patch("/api/comments/3", &json!({ "inc_votes": -2147483647 }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");

    let (_, body) = app.patch("/api/comments/3", &json!({ "inc_votes": 0 }));
    assert_eq!(body["votes"], -2147483547i64);
}

#[test]
fn patch_comment_votes_rejections() {
    let app = app();
    let (status, body) = app.patch("/api/comments/999", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(message(&body), "Comment ID not found");

    let (status, body) = app.patch("/api/comments/3", &json!({ "inc_votes": "banana" }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");

    let (status, body) = app.patch("/api/comments/banana", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(message(&body), "400 - Bad request");
}
