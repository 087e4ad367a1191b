pub mod search;

pub use search::SearchTweetsParams;
