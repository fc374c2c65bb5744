use reqwest::{header::HeaderMap, Client, StatusCode};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use crate::cache::{cache_key, CardCache};
use crate::card::Card;
use crate::error::AppError;

const API_BASE: &str = "https://api.scryfall.com";
// Scryfall asks for 50-100ms between requests.
const REQUEST_DELAY_MS: u64 = 100;
const MAX_RETRIES: u32 = 5;

#[derive(Deserialize)]
struct SearchPage {
    data: Vec<Card>,
}

pub async fn search_cards(
    client: &Client,
    headers: HeaderMap,
    query: &str,
) -> Result<Vec<Card>, Box<dyn Error>> {
    throttle().await;
    let url = Url::parse_with_params(
        &format!("{}/cards/search", API_BASE),
        &[("q", query), ("unique", "prints"), ("order", "name")],
    )?;
    let request = client.request(reqwest::Method::GET, url).headers(headers);

    let response = request.send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        // Scryfall answers an empty search with a 404.
        return Ok(Vec::new());
    }
    let body = response.text().await?;
    let page: SearchPage = serde_json::from_str(&body)?;
    Ok(page.data)
}

pub async fn fetch_card_named(
    client: &Client,
    headers: HeaderMap,
    name: &str,
    set: Option<&str>,
) -> Result<Card, Box<dyn Error + Send + Sync>> {
    throttle().await;
    let mut endpoint = format!(
        "{}/cards/named?fuzzy={}",
        API_BASE,
        urlencoding::encode(name)
    );
    if let Some(set) = set {
        endpoint.push_str(&format!("&set={}", urlencoding::encode(set)));
    }
    let request = client.request(reqwest::Method::GET, endpoint).headers(headers);

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(Box::new(AppError::new(&format!(
            "No card found for '{}' (status {})",
            name,
            response.status()
        ))));
    }
    let body = response.text().await?;
    let card: Card = serde_json::from_str(&body)?;
    Ok(card)
}

/// Named lookup through the injected cache; only misses hit the network.
pub async fn fetch_card_cached(
    client: &Client,
    headers: &HeaderMap,
    cache: &dyn CardCache,
    name: &str,
) -> Result<Card, Box<dyn Error + Send + Sync>> {
    let key = cache_key(name);
    if let Some(card) = cache.get(&key) {
        return Ok(card);
    }
    let card = fetch_card_named(client, headers.clone(), name, None).await?;
    cache.set(&key, card.clone());
    Ok(card)
}

/// Retrying named lookup with exponential backoff. Exhausted retries yield
/// `None` so a bulk sweep can keep going past one bad card.
pub async fn fetch_card_with_retry(
    client: &Client,
    headers: &HeaderMap,
    name: &str,
    set: Option<&str>,
) -> Option<Card> {
    let mut attempts = 0;
    loop {
        match fetch_card_named(client, headers.clone(), name, set).await {
            Ok(card) => return Some(card),
            Err(_) => {
                attempts += 1;
                if attempts >= MAX_RETRIES {
                    println!("Failed to fetch {} after {} attempts", name, MAX_RETRIES);
                    return None;
                }
                sleep(Duration::from_secs(2u64.pow(attempts))).await;
            }
        }
    }
}

async fn throttle() {
    sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;
}
