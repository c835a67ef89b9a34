use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse, Collapse},
        extractors::{ApiJson, ApiPath},
        pagination::{paginate, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::category_map;

// missing and null fields are both turned away by into_new_question
#[derive(Deserialize)]
struct CreateQuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl CreateQuestionBody {
    fn into_new_question(self) -> Option<NewQuestion> {
        Some(NewQuestion {
            question: self.question?,
            answer: self.answer?,
            category: self.category?,
            difficulty: self.difficulty?,
        })
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    #[serde(rename = "currentCategory")]
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    page: PageQuery,
) -> ApiResponse<QuestionsPage> {
    let questions = questions::get_all_questions(&pool).await?;
    let current = paginate(&questions, page.page());
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = categories::get_categories_by_id(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: current.to_vec(),
        total_questions: questions.len(),
        categories: category_map(categories),
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<ApiPath<i64>, ApiError>,
) -> ApiResponse<Deleted> {
    let ApiPath(id) = path.or_unprocessable()?;
    questions::delete_question(&pool, id)
        .await
        .or_unprocessable()?;
    QUESTIONS_DELETED.inc();
    tracing::info!("Deleted question {id}");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    page: PageQuery,
    ApiJson(body): ApiJson<CreateQuestionBody>,
) -> ApiResponse<Created> {
    let new_question = body.into_new_question().ok_or(ApiError::Unprocessable)?;
    let id = questions::create_question(&pool, &new_question)
        .await
        .or_unprocessable()?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {id}");

    let questions = questions::get_all_questions(&pool)
        .await
        .or_unprocessable()?;
    Ok(Json(Created {
        success: true,
        created: id,
        questions: paginate(&questions, page.page()).to_vec(),
        total_questions: questions.len(),
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    page: PageQuery,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => term,
        _ => return Err(ApiError::NotFound),
    };

    let matches = questions::search_questions(&pool, term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(SearchResults {
        success: true,
        questions: paginate(&matches, page.page()).to_vec(),
        total_questions: matches.len(),
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
