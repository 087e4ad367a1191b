use super::types::SearchPage;
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::search::SearchRequest;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: u64 = 10;
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    api_url: String,
}

impl TwitterClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| SearchError::ConfigInvalid("TWITTER_API_KEY contains invalid header characters".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("twitter-search-mcp/", env!("CARGO_PKG_VERSION"))));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, api_url: config.api_url.clone() })
    }

    /// Runs one search. An absent cursor is sent as `cursor=` so the provider serves the first page.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let params = [
            ("query", request.query.as_str()),
            ("queryType", request.mode.as_str()),
            ("cursor", request.cursor.as_deref().unwrap_or("")),
        ];

        let resp = self.client.get(&self.api_url).query(&params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!("Search API responded with HTTP {} ({} bytes)", status.as_u16(), body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| provider_message(&v, &["msg", "message"]));
            return Err(SearchError::Api { status: status.as_u16(), message });
        }

        parse_page(serde_json::from_str(&body)?)
    }
}

/// Checks that `tweets` is an array before trusting anything else in the payload.
pub fn parse_page(value: Value) -> Result<SearchPage> {
    if !value.get("tweets").is_some_and(Value::is_array) {
        return Err(SearchError::UnexpectedShape {
            message: provider_message(&value, &["message", "msg"]),
        });
    }
    serde_json::from_value(value).map_err(|e| SearchError::UnexpectedShape {
        message: Some(format!("malformed tweet data: {e}")),
    })
}

/// First non-empty string among `keys`, in order.
fn provider_message(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::QueryType;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TwitterClient {
        TwitterClient::new(&Config::for_testing(&format!("{}/twitter/tweet/advanced_search", server.uri()))).unwrap()
    }

    fn request(cursor: Option<&str>) -> SearchRequest {
        SearchRequest { query: "rust".into(), mode: QueryType::Top, cursor: cursor.map(String::from) }
    }

    #[tokio::test]
    async fn sends_empty_cursor_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/twitter/tweet/advanced_search"))
            .and(query_param("query", "rust"))
            .and(query_param("queryType", "Top"))
            .and(query_param("cursor", ""))
            .and(header("x-api-key", "test-key"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tweets": [{ "id": "1", "text": "hello" }],
                "has_next_page": true,
                "next_cursor": "NEXT"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).search(&request(None)).await.unwrap();
        assert_eq!(page.tweets.len(), 1);
        assert_eq!(page.continuation(), Some("NEXT"));
    }

    #[tokio::test]
    async fn forwards_supplied_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cursor", "abc/123=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tweets": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).search(&request(Some("abc/123=="))).await.unwrap();
        assert!(page.tweets.is_empty());
    }

    #[tokio::test]
    async fn error_status_carries_provider_msg() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "msg": "upstream down", "message": "ignored" })))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&request(None)).await.unwrap_err();
        match err {
            SearchError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.as_deref(), Some("upstream down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_has_no_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&request(None)).await.unwrap_err();
        assert!(matches!(err, SearchError::Api { status: 500, message: None }));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&request(None)).await.unwrap_err();
        assert!(matches!(err, SearchError::JsonParse(_)));
    }

    #[test]
    fn shape_check_prefers_message_then_msg() {
        let err = parse_page(json!({ "status": "error", "message": "bad key", "msg": "other" })).unwrap_err();
        assert!(matches!(err, SearchError::UnexpectedShape { message: Some(ref m) } if m == "bad key"));

        let err = parse_page(json!({ "msg": "quota" })).unwrap_err();
        assert!(matches!(err, SearchError::UnexpectedShape { message: Some(ref m) } if m == "quota"));

        let err = parse_page(json!({ "tweets": "nope" })).unwrap_err();
        assert!(matches!(err, SearchError::UnexpectedShape { message: None }));
    }

    #[test]
    fn one_odd_tweet_does_not_drop_the_page() {
        let page = parse_page(json!({
            "tweets": [
                { "id": "1", "likeCount": 3 },
                { "id": "2", "viewCount": "1234", "likeCount": -1 }
            ],
            "has_next_page": false,
            "next_cursor": 0
        }))
        .unwrap();
        assert_eq!(page.tweets.len(), 2);
        assert_eq!(page.tweets[0].like_count, Some(3));
        assert_eq!(page.tweets[1].view_count, Some(1234));
        assert_eq!(page.tweets[1].like_count, None);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn malformed_tweet_is_a_shape_error() {
        let err = parse_page(json!({ "tweets": [{ "text": "no id" }] })).unwrap_err();
        assert!(matches!(err, SearchError::UnexpectedShape { message: Some(ref m) } if m.contains("malformed")));
    }
}
