use inquire::{Confirm, InquireError, Select, Text};
use reqwest::{header::HeaderMap, Client};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Error as IOError};

use crate::api;
use crate::cache::CardCache;
use crate::color_identity::{self, format_identity};
use crate::deck::Deck;

const DECKS_FILE: &str = "decks.json";

pub fn load_decks() -> Result<Vec<Deck>, IOError> {
    let file = File::open(DECKS_FILE);
    match file {
        Ok(file) => {
            let reader = BufReader::new(file);
            let decks = serde_json::from_reader(reader)?;
            Ok(decks)
        }
        Err(_) => Ok(Vec::new()), // If the file doesn't exist, return an empty vector
    }
}

pub fn save_decks(decks: &Vec<Deck>) -> Result<(), IOError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(DECKS_FILE)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, decks)?;
    Ok(())
}

pub async fn manage_decks(
    client: &Client,
    headers: &HeaderMap,
    cache: &dyn CardCache,
) -> Result<(), Box<dyn Error>> {
    loop {
        let menu_options: Vec<&str> = vec![
            "Create deck",
            "Add card to deck",
            "Validate deck",
            "Deck stats",
            "Back",
        ];
        let menu_ans: Result<&str, InquireError> =
            Select::new("Decks:", menu_options.clone()).prompt();

        match menu_ans {
            Ok(choice) => match choice {
                "Create deck" => create_deck(client, headers).await?,
                "Add card to deck" => add_card_to_deck(client, headers, cache).await?,
                "Validate deck" => validate_deck()?,
                "Deck stats" => deck_stats()?,
                "Back" => break,
                _ => println!("Invalid choice"),
            },
            Err(_) => println!("There was an error, please try again"),
        }
    }
    Ok(())
}

async fn create_deck(client: &Client, headers: &HeaderMap) -> Result<(), Box<dyn Error>> {
    let name = Text::new("Deck name:").prompt()?;
    if name.trim().is_empty() {
        println!("Deck name must not be empty.");
        return Ok(());
    }

    let mut decks = load_decks()?;
    if decks.iter().any(|deck| deck.name == name) {
        println!("A deck named '{}' already exists.", name);
        return Ok(());
    }

    let mut deck = Deck::new(name.trim());
    let wants_commander = Confirm::new("Is this a Commander deck?")
        .with_default(true)
        .prompt()?;
    if wants_commander {
        let commander_name = Text::new("Commander name:").prompt()?;
        match api::fetch_card_named(client, headers.clone(), &commander_name, None).await {
            Ok(commander) => {
                println!(
                    "Commander: {} [{}]",
                    commander.name,
                    format_identity(&color_identity::card_identity(&commander))
                );
                deck.commander = Some(commander);
            }
            Err(e) => {
                println!("Could not fetch commander: {}", e);
                return Ok(());
            }
        }
    }

    decks.push(deck);
    save_decks(&decks)?;
    println!("Deck '{}' created.", name.trim());
    Ok(())
}

fn select_deck_index(decks: &[Deck]) -> Option<usize> {
    let labels: Vec<String> = decks
        .iter()
        .map(|deck| {
            format!(
                "{} [{}] ({} cards)",
                deck.name,
                format_identity(&deck.identity()),
                deck.copy_count()
            )
        })
        .collect();
    let select_ans: Result<String, InquireError> = Select::new("Select a deck:", labels.clone()).prompt();
    match select_ans {
        Ok(label) => labels.iter().position(|l| *l == label),
        Err(_) => {
            println!("Failed to select a deck.");
            None
        }
    }
}

async fn add_card_to_deck(
    client: &Client,
    headers: &HeaderMap,
    cache: &dyn CardCache,
) -> Result<(), Box<dyn Error>> {
    let mut decks = load_decks()?;
    if decks.is_empty() {
        println!("No decks yet. Create one first.");
        return Ok(());
    }
    let Some(index) = select_deck_index(&decks) else {
        return Ok(());
    };

    let card_name = Text::new("Card name:").prompt()?;
    let card = match api::fetch_card_cached(client, headers, cache, &card_name).await {
        Ok(card) => card,
        Err(e) => {
            println!("Could not fetch card: {}", e);
            return Ok(());
        }
    };
    let quantity: u32 = Text::new("How many copies?")
        .with_default("1")
        .prompt()?
        .trim()
        .parse()?;

    let deck = &mut decks[index];
    let deck_identity = deck.identity();
    if !color_identity::can_add_card(&card, &deck_identity) {
        println!(
            "{} [{}] is outside the deck's color identity [{}].",
            card.name,
            format_identity(&color_identity::card_identity(&card)),
            format_identity(&deck_identity)
        );
        let add_anyway = Confirm::new("Add it anyway?").with_default(false).prompt()?;
        if !add_anyway {
            return Ok(());
        }
    }

    println!("Adding {} x{} to {}", card.name, quantity, deck.name);
    deck.add_card(card, quantity);
    save_decks(&decks)?;
    Ok(())
}

fn validate_deck() -> Result<(), Box<dyn Error>> {
    let decks = load_decks()?;
    if decks.is_empty() {
        println!("No decks yet. Create one first.");
        return Ok(());
    }
    let Some(index) = select_deck_index(&decks) else {
        return Ok(());
    };
    let deck = &decks[index];

    let identity = deck.identity();
    let report = color_identity::validate_color_identity(&deck.card_list(), &identity);
    if report.valid {
        println!(
            "{} is legal for its identity [{}].",
            deck.name,
            format_identity(&identity)
        );
    } else {
        println!(
            "{} has {} card(s) outside [{}]:",
            deck.name,
            report.violations.len(),
            format_identity(&identity)
        );
        for violation in &report.violations {
            println!(
                "  {} [{}]",
                violation.card_name,
                format_identity(&violation.colors)
            );
        }
    }
    Ok(())
}

fn deck_stats() -> Result<(), Box<dyn Error>> {
    let decks = load_decks()?;
    if decks.is_empty() {
        println!("No decks yet. Create one first.");
        return Ok(());
    }
    let Some(index) = select_deck_index(&decks) else {
        return Ok(());
    };
    let deck = &decks[index];

    println!("Deck: {}", deck.name);
    if let Some(commander) = &deck.commander {
        println!("Commander: {}", commander.name);
    }
    println!("Color identity: {}", format_identity(&deck.identity()));
    println!("Total cards: {}", deck.copy_count());

    let curve = deck.mana_curve();
    println!("Mana curve (lands excluded):");
    for (bucket, copies) in curve.iter().enumerate() {
        let label = if bucket == 7 {
            "7+".to_string()
        } else {
            bucket.to_string()
        };
        println!("  {:>2}: {}", label, "#".repeat(*copies as usize));
    }
    Ok(())
}
