use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A page of search results after the `tweets` shape check has passed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    pub tweets: Vec<RawTweet>,
    #[serde(default, deserialize_with = "flag")]
    pub has_next_page: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub next_cursor: Option<String>,
}

impl SearchPage {
    /// The cursor to resubmit, only when the provider says more data exists.
    pub fn continuation(&self) -> Option<&str> {
        if !self.has_next_page {
            return None;
        }
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTweet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<RawAuthor>,
    #[serde(default, deserialize_with = "count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub reply_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub view_count: Option<u64>,
}

impl RawTweet {
    pub fn author_handle(&self) -> Option<&str> {
        self.author.as_ref()?.user_name.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "lenient")]
    pub user_name: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("tweet id must be a string or number, got {other}"))),
    }
}

/// A value of the wrong type becomes `None` instead of failing the whole page.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(de)?).ok())
}

/// Non-negative integers, also when sent as numeric strings.
fn count<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Anything other than `true` (or the string "true") reads as "no more pages".
fn flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
