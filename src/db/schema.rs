diesel::table! {
    articles (article_id) {
        article_id -> Integer,
        title -> Text,
        topic -> Text,
        author -> Text,
        body -> Text,
        created_at -> Timestamp,
        votes -> Integer,
        article_img_url -> Text,
    }
}

diesel::table! {
    comments (comment_id) {
        comment_id -> Integer,
        body -> Text,
        article_id -> Integer,
        author -> Text,
        votes -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    topics (slug) {
        slug -> Text,
        description -> Text,
    }
}

diesel::table! {
    users (username) {
        username -> Text,
        name -> Text,
        avatar_url -> Nullable<Text>,
    }
}

diesel::joinable!(articles -> topics (topic));
diesel::joinable!(articles -> users (author));
diesel::joinable!(comments -> articles (article_id));
diesel::joinable!(comments -> users (author));

diesel::allow_tables_to_appear_in_same_query!(articles, comments, topics, users);
