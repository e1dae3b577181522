use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_page, deserialize_search_term, first_page},
        error::{ApiError, JsonBody, QueryParams, RouteParam, ValidationError},
        pagination::paginate,
    },
};

use super::{format_categories, ApiResponse, Success};

#[derive(Deserialize)]
struct QuestionsQuery {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", deserialize_with = "deserialize_search_term")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    questions: Question,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    #[serde(rename = "totalQuestions")]
    total_questions: usize,
}

async fn questions_page(
    pool: &SqlitePool,
    questions: Vec<Question>,
    page: i64,
) -> ApiResponse<QuestionsPage> {
    let categories = get_all_categories(pool).await?;
    Ok(QuestionsPage {
        success: true,
        total_questions: questions.len(),
        questions: paginate(&questions, page).to_vec(),
        categories: format_categories(categories),
    })
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<QuestionsQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = match query.search_term.as_deref().filter(|term| !term.is_empty()) {
        Some(term) => questions::search_questions(&pool, term).await?,
        None => questions::get_all_questions(&pool).await?,
    };
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(questions_page(&pool, questions, query.page).await?))
}

// A body carrying `searchTerm` is a search; anything else is a new question.
async fn create_or_search_questions(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<QuestionsQuery>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResponse<Response> {
    let is_search = match &body {
        Value::Object(fields) => fields.contains_key("searchTerm"),
        _ => {
            tracing::warn!("Question body is not a JSON object");
            return Err(ApiError::InternalServerError);
        }
    };

    if is_search {
        let SearchBody { search_term } =
            serde_json::from_value(body).map_err(ValidationError::from)?;
        let questions = questions::search_questions(&pool, &search_term).await?;
        // An empty search here is a 500, unlike the 404 of the GET search.
        if questions.is_empty() {
            return Err(ApiError::InternalServerError);
        }
        return Ok(Json(questions_page(&pool, questions, query.page).await?).into_response());
    }

    let new_question: NewQuestion = serde_json::from_value(body).map_err(ValidationError::from)?;
    let question = questions::create_question(&pool, &new_question).await?;
    tracing::info!(id = question.id, "Question created");

    Ok(Json(CreatedQuestion {
        success: true,
        questions: question,
    })
    .into_response())
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    RouteParam(category): RouteParam<u64>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let category = i64::try_from(category).map_err(|_| ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, category).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoryQuestions {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

async fn update_question(
    State(pool): State<SqlitePool>,
    RouteParam(id): RouteParam<u64>,
    body: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<Json<Success>> {
    let Json(update) = body.map_err(|rejection| {
        tracing::warn!("Rejected question update: {rejection}");
        ApiError::InternalServerError
    })?;
    let id = i64::try_from(id).map_err(|_| ApiError::InternalServerError)?;

    questions::update_question(&pool, id, &update).await?;
    tracing::info!(id, "Question updated");
    Ok(Json(Success::new()))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    RouteParam(id): RouteParam<u64>,
) -> ApiResponse<Json<Success>> {
    let id = i64::try_from(id).map_err(|_| ApiError::NotFound)?;

    match questions::delete_question(&pool, id).await {
        Ok(removed) => {
            tracing::info!(id, removed, "Question deleted");
            Ok(Json(Success::new()))
        }
        Err(error) => {
            tracing::error!("Failed to delete question {id}: {error}");
            Err(ApiError::NotFound)
        }
    }
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/questions",
            get(list_questions).post(create_or_search_questions),
        )
        .route(
            "/questions/{id}",
            get(questions_for_category)
                .put(update_question)
                .delete(delete_question),
        )
}
