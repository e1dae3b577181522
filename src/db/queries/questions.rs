use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

/// A stored question, serialized as-is on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Every field a question carries except its id. Used for both create and full replace.
///
/// `category` and `difficulty` accept either a JSON integer or a string holding one,
/// since form-driven clients tend to send select values as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text.
///
/// `%` and `_` in the term act as `LIKE` wildcards. Case folding covers all of Unicode,
/// not only ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let pattern: Vec<char> = format!("%{}%", term.to_lowercase()).chars().collect();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|question| {
            let text: Vec<char> = question.question.to_lowercase().chars().collect();
            like_matches(&text, &pattern)
        })
        .collect())
}

// `%` is any run of characters, `_` exactly one
fn like_matches(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '_' || c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((wildcard, start)) => {
                    p = wildcard + 1;
                    t = start + 1;
                    backtrack = Some((wildcard, start + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<Question>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn create_question(pool: &SqlitePool, new: &NewQuestion) -> sqlx::Result<Question> {
    let mut tx = pool.begin().await?;

    let question = sqlx::query_as::<_, Question>(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
RETURNING id, question, answer, category, difficulty
        "#,
    )
    .bind(&new.question)
    .bind(&new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(question)
}

/// Overwrites all four fields of an existing question.
///
/// Fails with [`sqlx::Error::RowNotFound`] when no question has this id.
pub async fn update_question(
    pool: &SqlitePool,
    id: i64,
    update: &NewQuestion,
) -> sqlx::Result<Question> {
    let mut tx = pool.begin().await?;

    if get_question_by_id(&mut *tx, id).await?.is_none() {
        return Err(sqlx::Error::RowNotFound);
    }

    let question = sqlx::query_as::<_, Question>(
        r#"
UPDATE questions SET question=?1, answer=?2, category=?3, difficulty=?4 WHERE questions.id = ?5
RETURNING id, question, answer, category, difficulty
        "#,
    )
    .bind(&update.question)
    .bind(&update.answer)
    .bind(update.category)
    .bind(update.difficulty)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(question)
}

/// Returns the number of removed rows; zero when the id is unknown.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    Ok(removed)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
