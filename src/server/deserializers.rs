use serde::{Deserialize, Deserializer};

pub fn first_page() -> i64 {
    1
}

// `page` is optional and anything that is not an integer falls back to the first page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1))
}

// search terms are matched as text, so scalar JSON values are accepted and rendered
pub fn deserialize_search_term<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(term) => Ok(term),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(true) => Ok("True".to_owned()),
        serde_json::Value::Bool(false) => Ok("False".to_owned()),
        serde_json::Value::Null => Ok("None".to_owned()),
        other => Err(serde::de::Error::custom(format!(
            "search term must be a scalar, got {other}"
        ))),
    }
}

/// Category reference sent by quiz clients, which use the category mapping keys
/// (strings) as often as plain integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Text(String),
}

impl CategoryRef {
    /// `None` when the reference can never match a stored category id.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            CategoryRef::Id(id) => Some(*id),
            CategoryRef::Text(text) => text
                .parse::<i64>()
                .ok()
                .filter(|id| id.to_string() == *text),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryRef::Id(0))
    }
}
