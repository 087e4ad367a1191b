mod client;
mod types;

pub use client::TwitterClient;
pub use types::{RawTweet, SearchPage};
#[cfg(test)]
pub use types::RawAuthor;
