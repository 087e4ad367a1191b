use crate::error::{Result, SearchError};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.twitterapi.io/twitter/tweet/advanced_search";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub transport: Transport,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. A missing or blank `TWITTER_API_KEY` is fatal.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_opt = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let api_key = lookup("TWITTER_API_KEY").ok_or_else(|| missing("TWITTER_API_KEY"))?;
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SearchError::ConfigInvalid("TWITTER_API_KEY cannot be empty".into()));
        }

        let api_url = env_opt("TWITTER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        validate_url(&api_url)?;

        let timeout = parse_u64_range("TWITTER_API_TIMEOUT", env_opt("TWITTER_API_TIMEOUT"), DEFAULT_TIMEOUT_SECS, 1, 300)?;

        let transport = match env_opt("MCP_TRANSPORT").map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("stdio") => Transport::Stdio,
            Some("http") => Transport::Http,
            Some(other) => {
                return Err(SearchError::ConfigInvalid(format!(
                    "MCP_TRANSPORT must be 'stdio' or 'http', got '{other}'"
                )));
            }
        };

        let port = match env_opt("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
                SearchError::ConfigInvalid("PORT must be an integer between 1 and 65535".into())
            })?,
        };

        Ok(Self {
            api_url: api_url.trim().to_string(),
            api_key,
            request_timeout: Duration::from_secs(timeout),
            transport,
            port,
        })
    }

    pub fn mask_api_key(&self) -> String {
        mask_key(&self.api_key)
    }

    #[cfg(test)]
    pub fn for_testing(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: "test-key".into(),
            request_timeout: Duration::from_secs(5),
            transport: Transport::Stdio,
            port: DEFAULT_PORT,
        }
    }
}

fn missing(name: &str) -> SearchError {
    SearchError::ConfigMissing(format!(
        "{name} not configured.\nPlease configure with:\nclaude mcp add-json twitter-search --scope user \
        '{{\"type\":\"stdio\",\"command\":\"twitter-search-mcp\",\"env\":{{\"{name}\":\"your-key\"}}}}'"
    ))
}

fn parse_u64_range(name: &str, raw: Option<String>, default: u64, min: u64, max: u64) -> Result<u64> {
    let Some(raw) = raw else { return Ok(default) };
    let val: u64 = raw.trim().parse().map_err(|_| {
        SearchError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
    })?;
    if !(min..=max).contains(&val) {
        return Err(SearchError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SearchError::ConfigInvalid("TWITTER_API_URL must be a valid http or https URL".into()));
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "********".into();
    }
    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len()-4..].iter().collect();
    format!("{first}********{last}")
}
