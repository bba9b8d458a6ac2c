use nc_news::db;
use nc_news::db::seed::{seed, SeedData};
use rocket::http::Status;
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::Value;
use tempfile::TempDir;

/// A client over a freshly seeded database file that lives as long as the
/// client does.
pub struct TestApp {
    pub client: Client,
    _dir: TempDir,
}

pub fn app() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nc_news_test.db");
    let pool = db::init_pool_with(path.to_str().expect("utf-8 temp path"), 4)
        .expect("create test pool");
    {
        let mut conn = pool.get().expect("test connection");
        let data = SeedData::test().expect("test fixture parses");
        seed(&mut conn, &data).expect("seed test database");
    }
    let client = Client::tracked(nc_news::build(pool)).expect("valid rocket instance");
    TestApp { client, _dir: dir }
}

pub fn json_of(response: LocalResponse<'_>) -> (Status, Value) {
    let status = response.status();
    let body = response.into_json::<Value>().unwrap_or(Value::Null);
    (status, body)
}

impl TestApp {
    pub fn get(&self, uri: &str) -> (Status, Value) {
        json_of(self.client.get(uri.to_string()).dispatch())
    }

    pub fn post(&self, uri: &str, body: &Value) -> (Status, Value) {
        json_of(self.client.post(uri.to_string()).json(body).dispatch())
    }

    pub fn patch(&self, uri: &str, body: &Value) -> (Status, Value) {
        json_of(self.client.patch(uri.to_string()).json(body).dispatch())
    }
}

pub fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

pub fn strings<'a>(rows: &'a Value, field: &str) -> Vec<&'a str> {
    rows.as_array()
        .expect("array of rows")
        .iter()
        .map(|row| row[field].as_str().expect("string field"))
        .collect()
}

pub fn is_descending<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] >= w[1])
}

pub fn is_ascending<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
