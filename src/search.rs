use crate::report;
use crate::twitter::TwitterClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result ordering requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum QueryType {
    #[default]
    Latest,
    Top,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::Top => "Top",
        }
    }
}

/// A validated search, built fresh for each tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: QueryType,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchHandler {
    client: TwitterClient,
}

impl SearchHandler {
    pub fn new(client: TwitterClient) -> Self {
        Self { client }
    }

    /// Always yields text: either the report or a description of what went wrong.
    pub async fn handle(&self, request: &SearchRequest) -> String {
        debug!(
            "Searching tweets: query={:?} mode={} cursor={}",
            request.query,
            request.mode.as_str(),
            request.cursor.is_some()
        );

        match self.client.search(request).await {
            Ok(page) => {
                debug!("Received {} tweets (has_next_page={})", page.tweets.len(), page.has_next_page);
                report::render(request, &page)
            }
            Err(e) => {
                warn!("Tweet search failed: {}", e);
                report::describe_error(&e, request.cursor.is_some())
            }
        }
    }
}
