use crate::search::{QueryType, SearchRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MAX_QUERY_CHARS: usize = 2000;
const MAX_CURSOR_CHARS: usize = 2048;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchTweetsParams {
    /// Search query using Twitter advanced search syntax (e.g. "\"AI\" from:openai since:2024-01-01")
    pub query: String,

    /// Result ordering: "Latest" (default) or "Top"
    #[serde(rename = "queryType", default)]
    pub query_type: QueryType,

    /// Cursor from a previous response's pagination footer; omit for the first page
    #[serde(default)]
    pub cursor: Option<String>,
}

impl SearchTweetsParams {
    pub fn validate(&self) -> Result<(), String> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err("Query cannot be empty".into());
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(format!("Query exceeds {MAX_QUERY_CHARS} characters"));
        }
        if let Some(cursor) = &self.cursor {
            if cursor.trim().chars().count() > MAX_CURSOR_CHARS {
                return Err(format!("Cursor exceeds {MAX_CURSOR_CHARS} characters"));
            }
        }
        Ok(())
    }

    /// Blank cursors count as "first page".
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            query: self.query.trim().to_string(),
            mode: self.query_type,
            cursor: self
                .cursor
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SearchTweetsParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_to_latest_first_page() {
        let params = parse(json!({ "query": "  rust  " }));
        assert!(params.validate().is_ok());
        let req = params.into_request();
        assert_eq!(req.query, "rust");
        assert_eq!(req.mode, QueryType::Latest);
        assert_eq!(req.cursor, None);
    }

    #[test]
    fn accepts_query_type_and_cursor() {
        let req = parse(json!({ "query": "rust", "queryType": "Top", "cursor": " abc " })).into_request();
        assert_eq!(req.mode, QueryType::Top);
        assert_eq!(req.cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn blank_cursor_is_absent() {
        let req = parse(json!({ "query": "rust", "cursor": "   " })).into_request();
        assert_eq!(req.cursor, None);
    }

    #[test]
    fn rejects_unknown_query_type() {
        assert!(serde_json::from_value::<SearchTweetsParams>(json!({ "query": "x", "queryType": "Oldest" })).is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(json!({ "query": "   " })).validate().is_err());
        assert!(parse(json!({ "query": "q".repeat(2001) })).validate().is_err());
        assert!(parse(json!({ "query": "ok", "cursor": "c".repeat(2049) })).validate().is_err());
        assert!(parse(json!({ "query": "q".repeat(2000) })).validate().is_ok());
    }
}
