use futures::future::join_all;
use indicatif::ProgressBar;
use reqwest::{header::HeaderMap, Client};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Error as IOError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task;
use tokio::time::sleep;

use crate::api;
use crate::error::AppError;
use crate::telegram;
use crate::value::price_cents;

const MAX_CONCURRENT_CHECKS: usize = 10;
const WISHLIST_FILE: &str = "wishlist.json";
const CONTINUOUS_CHECK_INTERVAL_SECS: u64 = 60;

#[derive(Serialize, Deserialize, Clone)]
pub struct WishlistItem {
    pub card_name: String,
    pub set_code: Option<String>,
    pub collector_number: Option<String>,
    pub target_price_cents: u32,
    pub last_price_cents: Option<u32>,
}

pub fn add_to_wishlist(item: WishlistItem) -> Result<(), IOError> {
    let mut wishlist = load_wishlist()?;
    println!("Adding {} to wishlist", item.card_name);
    wishlist.push(item);
    save_wishlist(&wishlist)
}

fn load_wishlist() -> Result<Vec<WishlistItem>, IOError> {
    let file = File::open(WISHLIST_FILE);
    match file {
        Ok(file) => {
            let reader = BufReader::new(file);
            let wishlist = serde_json::from_reader(reader)?;
            Ok(wishlist)
        }
        Err(_) => Ok(Vec::new()), // If the file doesn't exist, return an empty vector
    }
}

fn save_wishlist(wishlist: &Vec<WishlistItem>) -> Result<(), IOError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(WISHLIST_FILE)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, wishlist)?;
    Ok(())
}

/// Sweep the wishlist against current market prices, alert on drops below
/// target, and remember the last seen price per item.
pub async fn check_wishlist_prices(client: &Client, headers: &HeaderMap) -> Result<(), AppError> {
    let mut wishlist = load_wishlist().map_err(|e| AppError::new(&e.to_string()))?;
    if wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return Ok(());
    }

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_CHECKS));
    let mut tasks = Vec::new();

    let pb = ProgressBar::new(wishlist.len() as u64);
    for (index, item) in wishlist.iter().enumerate() {
        let semaphore_clone = Arc::clone(&semaphore);
        let item_clone = item.clone();
        let client_clone = client.clone();
        let headers_clone = headers.clone();

        let pb_clone = pb.clone();
        let task = task::spawn(async move {
            let _permit = semaphore_clone
                .acquire()
                .await
                .map_err(|e| AppError::new(&e.to_string()))?;
            let card = api::fetch_card_with_retry(
                &client_clone,
                &headers_clone,
                &item_clone.card_name,
                item_clone.set_code.as_deref(),
            )
            .await;

            pb_clone.inc(1);
            let current = card.as_ref().map(|c| price_cents(c, false)).unwrap_or(0);
            Ok((index, current)) as Result<(usize, u32), AppError>
        });

        tasks.push(task);
    }

    let results = join_all(tasks).await;
    pb.finish_with_message("Finished checking prices");

    let mut alert_messages = Vec::new();
    for result in results {
        match result {
            Ok(Ok((index, current))) => {
                let item = &mut wishlist[index];
                if current > 0 && current < item.target_price_cents {
                    let alert_message = format!(
                        "*{}{}*\nTarget: _$ {}_\nCurrent: *$ {}*",
                        telegram::escape_markdown(&item.card_name),
                        telegram::escape_markdown(
                            &item
                                .set_code
                                .clone()
                                .map(|s| format!(" [{}]", s.to_uppercase()))
                                .unwrap_or_default()
                        ),
                        telegram::escape_markdown(&format!(
                            "{:.2}",
                            item.target_price_cents as f64 / 100.0
                        )),
                        telegram::escape_markdown(&format!("{:.2}", current as f64 / 100.0)),
                    );
                    alert_messages.push(alert_message);
                }
                if current > 0 {
                    item.last_price_cents = Some(current);
                }
            }
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(AppError::new(&format!("Task failed: {}", e))),
        }
    }

    if !alert_messages.is_empty() {
        telegram::send_price_alerts("Price drop alert", &alert_messages)
            .await
            .map_err(|e| AppError::new(&e.to_string()))?;
    } else {
        println!("No price drops below target.");
    }

    save_wishlist(&wishlist).map_err(|e| AppError::new(&e.to_string()))?;
    Ok(())
}

pub async fn continuous_check_prices(
    client: &Client,
    headers: &HeaderMap,
) -> Result<(), Box<dyn Error>> {
    loop {
        println!("Checking wishlist prices...");
        check_wishlist_prices(client, headers).await?;
        println!("Press Ctrl+C to stop continuous price check.");
        sleep(Duration::from_secs(CONTINUOUS_CHECK_INTERVAL_SECS)).await;
    }
}
