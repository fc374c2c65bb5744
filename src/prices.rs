use indicatif::ProgressBar;
use reqwest::{header::HeaderMap, Client};
use std::error::Error;

use crate::api;
use crate::collection_controller::{load_collection, save_collection};
use crate::telegram;
use crate::value::price_cents;

/// Re-fetch every collection row and rewrite its cached price. Slow (one
/// lookup per row) and rewrites collection.json, hence the "Danger" menu slot.
pub async fn refresh_collection_prices(
    client: &Client,
    headers: &HeaderMap,
) -> Result<(), Box<dyn Error>> {
    let mut collection = load_collection()?;
    if collection.is_empty() {
        println!("Your collection is empty.");
        return Ok(());
    }

    println!("Refreshing prices for {} cards...", collection.len());
    let bar = ProgressBar::new(collection.len() as u64);
    let mut alert_messages = Vec::new();

    for item in collection.iter_mut() {
        let fetched = api::fetch_card_with_retry(
            client,
            headers,
            &item.card.name,
            item.card.set.as_deref(),
        )
        .await;

        if let Some(card) = fetched {
            let current = price_cents(&card, false);
            if let Some(previous) = item.cached_price_cents {
                if current > 0 && current < previous {
                    println!(
                        "{}: $ {:.2} is lower than the cached $ {:.2}",
                        card.name,
                        current as f64 / 100.0,
                        previous as f64 / 100.0
                    );
                    alert_messages.push(format!(
                        "*{}*\nDrop: _$ {}_\nCurrent: *$ {}*",
                        telegram::escape_markdown(&card.name),
                        telegram::escape_markdown(&format!(
                            "{:.2}",
                            (previous - current) as f64 / 100.0
                        )),
                        telegram::escape_markdown(&format!("{:.2}", current as f64 / 100.0)),
                    ));
                }
            }
            item.card.prices = card.prices.clone();
            if current > 0 {
                item.cached_price_cents = Some(current);
            }
        }
        bar.inc(1);
    }

    bar.finish();
    save_collection(&collection)?;

    if !alert_messages.is_empty() {
        telegram::send_price_alerts("Collection price drops", &alert_messages).await?;
    }

    println!("Prices updated successfully!");
    Ok(())
}
