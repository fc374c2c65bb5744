mod api;
mod cache;
mod card;
mod cards_controller;
mod collection;
mod collection_controller;
mod color_identity;
mod deck;
mod deck_controller;
mod error;
mod headers;
mod prices;
mod telegram;
mod value;
mod wishlist_controller;

use inquire::{InquireError, Select};
use std::error::Error;
use std::time::Duration;
use whoami;

use crate::cache::MemoryCache;

const CARD_CACHE_TTL_SECS: u64 = 15 * 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let client = reqwest::Client::builder().build()?;
    let headers = headers::request_headers();
    let cache = MemoryCache::new(Duration::from_secs(CARD_CACHE_TTL_SECS));

    let user_name = whoami::username();
    println!("Hi, {}! welcome to ManaVault.", user_name);

    loop {
        let menu_options: Vec<&str> = vec![
            "Search cards",
            "Collection stats",
            "Manage collection",
            "Manage decks",
            "Check wishlist prices",
            "Continuous wishlist check",
            "Refresh collection prices (Danger)",
            "Exit",
        ];
        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", menu_options.clone()).prompt();

        match menu_ans {
            Ok(choice) => match choice {
                "Search cards" => {
                    cards_controller::search_and_select_cards(&client, &headers, &cache).await?
                }
                "Collection stats" => collection_controller::show_collection_stats()?,
                "Manage collection" => collection_controller::manage_collection()?,
                "Manage decks" => deck_controller::manage_decks(&client, &headers, &cache).await?,
                "Check wishlist prices" => {
                    wishlist_controller::check_wishlist_prices(&client, &headers).await?
                }
                "Continuous wishlist check" => {
                    wishlist_controller::continuous_check_prices(&client, &headers).await?
                }
                "Refresh collection prices (Danger)" => {
                    prices::refresh_collection_prices(&client, &headers).await?
                }
                "Exit" => break,
                _ => println!("Invalid choice"),
            },
            Err(_) => println!("There was an error, please try again"),
        }
    }

    Ok(())
}
