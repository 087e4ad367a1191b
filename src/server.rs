use crate::config::Config;
use crate::search::SearchHandler;
use crate::tools::SearchTweetsParams;
use crate::twitter::TwitterClient;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};

const INSTRUCTIONS: &str = "Search Twitter/X with the search_tweets tool. \
    The query accepts advanced search operators (from:, to:, since:, until:, \"exact phrase\", -exclude). \
    Each result ends with a pagination footer: pass its 'Next cursor' value back as `cursor` to get the next page, \
    or stop when it says 'End of results.'";

#[derive(Clone)]
pub struct TwitterSearchServer {
    handler: SearchHandler,
}

impl TwitterSearchServer {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let client = TwitterClient::new(config)?;
        Ok(Self { handler: SearchHandler::new(client) })
    }
}

#[tool_router]
impl TwitterSearchServer {
    #[tool(description = r#"
    Searches recent tweets on Twitter/X and returns a readable text report.

    The `query` uses Twitter advanced search syntax, e.g. `"AI" from:openai since:2024-01-01`.

    The `queryType` selects ordering: "Latest" (default, newest first) or "Top" (most relevant).

    The `cursor` continues a previous search. Omit it for the first page; to fetch the next page,
    pass the exact value printed after "Next cursor:" in the previous result.

    Returns
    -------
    str
        One numbered block per tweet (author, id, text truncated to 250 characters, timestamp,
        link, likes/retweets/replies/views) followed by a pagination footer containing either
        "Next cursor: <value>" or "End of results.". Failures are returned as text starting with "Error:".
    "#)]
    pub async fn search_tweets(&self, Parameters(params): Parameters<SearchTweetsParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;
        let request = params.into_request();
        Ok(self.handler.handle(&request).await)
    }
}

#[tool_handler(router = Self::tool_router())]
impl ServerHandler for TwitterSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "twitter-search".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }
}
