use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{
        app::AppState,
        deserializers::{into_ids, LooseI64},
        error::{ApiError, ApiResponse, Collapse},
        extractors::ApiJson,
    },
    telemetry::QUIZ_DRAWS,
};

/// Category type the client sends to play across all categories.
pub const ALL_CATEGORIES_SENTINEL: &str = "click";

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Option<Vec<LooseI64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

impl QuizCategory {
    /// `Ok(None)` means no filter.
    fn filter(&self) -> Result<Option<i64>, ApiError> {
        if self.kind == ALL_CATEGORIES_SENTINEL {
            return Ok(None);
        }
        match self.id {
            Some(id) => Ok(Some(id)),
            None => {
                tracing::warn!("Quiz category {:?} has no id", self.kind);
                Err(ApiError::Unprocessable)
            }
        }
    }
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

fn draw(candidates: Vec<Question>) -> Option<Question> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<QuizBody>,
) -> ApiResponse<QuizQuestion> {
    let (Some(previous), Some(category)) = (body.previous_questions, body.quiz_category) else {
        return Err(ApiError::Unprocessable);
    };
    let previous = into_ids(previous);
    let filter = category.filter()?;

    let candidates = questions::get_quiz_candidates(&pool, &previous, filter)
        .await
        .or_unprocessable()?;
    tracing::debug!(
        "{} quiz candidates after excluding {} questions",
        candidates.len(),
        previous.len()
    );
    let question = draw(candidates);

    if question.is_some() {
        let label = filter.map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_DRAWS.with_label_values(&[label.as_str()]).inc();
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64) -> Question {
        Question {
            id,
            question: format!("Question {id}"),
            answer: "Answer".to_owned(),
            category: 1,
            difficulty: 1,
        }
    }

    #[test]
    fn draw_from_empty_is_none() {
        assert_eq!(draw(vec![]), None);
    }

    #[test]
    fn draw_picks_a_candidate() {
        let candidates: Vec<Question> = (1..=5).map(question).collect();
        for _ in 0..20 {
            let picked = draw(candidates.clone()).unwrap();
            assert!(candidates.contains(&picked));
        }
    }

    #[test]
    fn sentinel_disables_category_filter() {
        let category: QuizCategory =
            serde_json::from_str(r#"{"type": "click", "id": 0}"#).unwrap();
        assert_eq!(category.filter().unwrap(), None);

        let category: QuizCategory =
            serde_json::from_str(r#"{"type": "Science", "id": "1"}"#).unwrap();
        assert_eq!(category.filter().unwrap(), Some(1));
    }

    #[test]
    fn category_without_id_is_unprocessable() {
        let category: QuizCategory = serde_json::from_str(r#"{"type": "Art"}"#).unwrap();
        assert!(matches!(category.filter(), Err(ApiError::Unprocessable)));
    }
}
