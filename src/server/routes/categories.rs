use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse, Collapse},
        extractors::ApiPath,
        pagination::{paginate, PageQuery},
    },
};

use super::category_map;

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(rename = "currentCategory")]
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = categories::get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        categories: category_map(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    page: PageQuery,
) -> ApiResponse<CategoryQuestionsBody> {
    let known = categories::get_category_ids(&pool).await.or_not_found()?;
    if !known.contains(&id) {
        tracing::debug!("Unknown category {id}");
        return Err(ApiError::NotFound);
    }

    let questions = questions::get_questions_for_category(&pool, id)
        .await
        .or_not_found()?;
    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions: paginate(&questions, page.page()).to_vec(),
        total_questions: questions.len(),
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
