use dotenv::dotenv;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::env;

const DEFAULT_USER_AGENT: &str = "manavault/0.1";

// Scryfall asks clients to identify themselves; no auth token is needed.
pub fn request_headers() -> HeaderMap {
    dotenv().ok();
    let mut headers = HeaderMap::new();
    let agent =
        env::var("SCRYFALL_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
