use inquire::{InquireError, Select, Text};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Error as IOError};

use crate::card::Card;
use crate::collection::{self, CollectionItem, Condition};
use crate::value;

const COLLECTION_FILE: &str = "collection.json";

pub fn load_collection() -> Result<Vec<CollectionItem>, IOError> {
    let file = File::open(COLLECTION_FILE);
    match file {
        Ok(file) => {
            let reader = BufReader::new(file);
            let collection = serde_json::from_reader(reader)?;
            Ok(collection)
        }
        Err(_) => Ok(Vec::new()), // If the file doesn't exist, return an empty vector
    }
}

pub fn save_collection(collection: &Vec<CollectionItem>) -> Result<(), IOError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(COLLECTION_FILE)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, collection)?;
    Ok(())
}

/// Prompt for quantities and condition, then merge the card into the
/// collection file.
pub fn prompt_and_add(card: Card) -> Result<(), Box<dyn Error>> {
    let quantity: u32 = Text::new("How many regular copies?")
        .with_default("1")
        .prompt()?
        .trim()
        .parse()?;
    let foil_quantity: u32 = Text::new("How many foil copies?")
        .with_default("0")
        .prompt()?
        .trim()
        .parse()?;
    if quantity + foil_quantity == 0 {
        println!("Nothing to add.");
        return Ok(());
    }
    let condition = Select::new("Condition:", Condition::ALL.to_vec()).prompt()?;

    let mut collection = load_collection()?;
    println!("Adding {} to collection", card.name);
    collection::add_card(&mut collection, card, quantity, foil_quantity, condition);
    save_collection(&collection)?;
    Ok(())
}

/// Pick a row and rewrite its quantities; zeroing both removes the row.
pub fn manage_collection() -> Result<(), Box<dyn Error>> {
    let mut collection = load_collection()?;
    if collection.is_empty() {
        println!("Your collection is empty.");
        return Ok(());
    }

    let labels: Vec<String> = collection.iter().map(|item| item.label()).collect();
    let select_ans: Result<String, InquireError> =
        Select::new("Select a card to update:", labels).prompt();

    match select_ans {
        Ok(label) => {
            if let Some(item) = collection.iter().find(|item| item.label() == label) {
                let card_id = item.card.id.clone();
                let quantity: u32 = Text::new("New regular quantity:")
                    .with_default(&item.quantity.to_string())
                    .prompt()?
                    .trim()
                    .parse()?;
                let foil_quantity: u32 = Text::new("New foil quantity:")
                    .with_default(&item.foil_quantity.to_string())
                    .prompt()?
                    .trim()
                    .parse()?;

                let name = item.card.name.clone();
                collection::set_quantities(&mut collection, &card_id, quantity, foil_quantity);
                if quantity + foil_quantity == 0 {
                    println!("Removed {} from the collection.", name);
                }
                save_collection(&collection)?;
            } else {
                println!("Card not found.");
            }
        }
        Err(_) => println!("Failed to select a card."),
    }

    Ok(())
}

pub fn show_collection_stats() -> Result<(), Box<dyn Error>> {
    let collection = load_collection()?;
    let totals = value::collection_totals(&collection);

    println!("Unique cards: {}", totals.unique);
    println!("Total copies: {}", totals.count);
    println!(
        "Collection value: $ {:.2}",
        totals.value_cents as f64 / 100.0
    );
    println!("Average mana value: {:.2}", totals.avg_cmc);

    let top = value::top_value_cards(&collection, 10);
    if !top.is_empty() {
        println!("\nTop value cards:");
        for (rank, item) in top.iter().enumerate() {
            println!(
                "{}. {} x{} (+{} foil) - $ {:.2}",
                rank + 1,
                item.card.name,
                item.quantity,
                item.foil_quantity,
                value::item_value_cents(item) as f64 / 100.0
            );
        }
    }

    let color_dist = value::color_distribution(&collection);
    if !color_dist.is_empty() {
        println!("\nCopies by color:");
        for bucket in ["W", "U", "B", "R", "G", "Colorless"] {
            if let Some(copies) = color_dist.get(bucket) {
                println!("  {}: {}", bucket, copies);
            }
        }
    }

    let type_dist = value::type_distribution(&collection);
    if !type_dist.is_empty() {
        println!("\nCopies by type:");
        let mut entries: Vec<(&String, &u32)> = type_dist.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (type_name, copies) in entries {
            println!("  {}: {}", type_name, copies);
        }
    }

    Ok(())
}
