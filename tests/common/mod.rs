#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use trivia_api::db::queries::questions::create_question;
use trivia_api::db::{establish_connection, run_migrations, NewQuestion};
use trivia_api::server::{router, AppState};

pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
    // removes the database file on drop
    _dir: TempDir,
}

impl TestApp {
    /// Migrated database with the seeded categories and no questions.
    pub async fn new() -> TestApp {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite:{}", dir.path().join("trivia.db").display());
        let pool = establish_connection(&url).await.expect("connect to test db");
        run_migrations(&pool).await.expect("migrate test db");
        let router = router(AppState { pool: pool.clone() });
        TestApp {
            pool,
            router,
            _dir: dir,
        }
    }

    pub async fn add_question(&self, question: &str, category: i64) -> i64 {
        create_question(
            &self.pool,
            &NewQuestion {
                question: question.to_owned(),
                answer: format!("Answer to {question}"),
                category,
                difficulty: 2,
            },
        )
        .await
        .expect("insert question")
    }

    pub async fn question_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .expect("count questions")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Body as text, for endpoints that do not answer with JSON.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .router
            .clone()
            .oneshot(req.body(body).expect("request build should succeed"))
            .await
            .expect("router should respond");

        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert_eq!(body["message"], message);
}
