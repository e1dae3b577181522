use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{app::AppState, deserializers::CategoryRef, error::JsonBody},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    id: CategoryRef,
}

#[derive(Deserialize)]
struct PlayRequest {
    quiz_category: QuizCategory,
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct PlayResponse {
    success: bool,
    question: Option<Question>,
    #[serde(rename = "forceEnd")]
    force_end: bool,
}

async fn candidates(pool: &SqlitePool, category: &CategoryRef) -> sqlx::Result<Vec<Question>> {
    if category.is_all() {
        return questions::get_all_questions(pool).await;
    }
    match category.as_id() {
        Some(id) => questions::get_questions_for_category(pool, id).await,
        None => Ok(Vec::new()),
    }
}

async fn play(
    State(pool): State<SqlitePool>,
    JsonBody(request): JsonBody<PlayRequest>,
) -> ApiResponse<Json<PlayResponse>> {
    let asked: HashSet<i64> = request
        .previous_questions
        .unwrap_or_default()
        .into_iter()
        .collect();
    let remaining: Vec<Question> = candidates(&pool, &request.quiz_category.id)
        .await?
        .into_iter()
        .filter(|question| !asked.contains(&question.id))
        .collect();

    let question = remaining.choose(&mut rand::thread_rng()).cloned();
    match &question {
        Some(question) => {
            let category = question.category.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.as_str()])
                .inc();
        }
        None => tracing::info!("Quiz exhausted, forcing end"),
    }

    Ok(Json(PlayResponse {
        success: true,
        force_end: question.is_none(),
        question,
    }))
}

pub fn play_router() -> Router<AppState> {
    Router::new().route("/play", post(play))
}
