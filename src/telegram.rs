use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::error::Error;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use teloxide::Bot;

const MAX_MESSAGE_LENGTH: usize = 4000;

pub async fn send_message(
    token: &str,
    chat_id: ChatId,
    message: &str,
) -> Result<(), Box<dyn Error>> {
    let client = Client::builder().build()?;
    let bot = Bot::with_client(token, client).parse_mode(ParseMode::MarkdownV2);
    bot.send_message(chat_id, message).send().await?;
    Ok(())
}

/// Consolidate alert lines under a title and deliver them. Sends via Telegram
/// when TELEGRAM_TOKEN / TELEGRAM_CHAT_ID are configured, otherwise prints.
pub async fn send_price_alerts(title: &str, alerts: &[String]) -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let token = env::var("TELEGRAM_TOKEN");
    let chat_id = env::var("TELEGRAM_CHAT_ID")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok());

    match (token, chat_id) {
        (Ok(token), Some(chat_id)) => {
            let chat_id = ChatId(chat_id);
            for chunk in split_message(&alerts.join("\n\n"), MAX_MESSAGE_LENGTH) {
                let consolidated_message = format!("*{}\\!*\n\n{}", escape_markdown(title), chunk);
                send_message(&token, chat_id, &consolidated_message).await?;
            }
        }
        _ => {
            println!("Telegram is not configured, printing alerts instead:");
            for alert in alerts {
                println!("{}\n", alert);
            }
        }
    }
    Ok(())
}

// Escape helper for MarkdownV2 special characters.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::new();
    for c in text.chars() {
        match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
            | '{' | '}' | '.' | '!' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn split_message(message: &str, max_length: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_chunk = String::new();

    for line in message.lines() {
        if current_chunk.len() + line.len() + 1 > max_length {
            result.push(current_chunk.clone());
            current_chunk.clear();
        }
        current_chunk.push_str(line);
        current_chunk.push('\n');
    }

    if !current_chunk.is_empty() {
        result.push(current_chunk);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_special_characters_are_escaped() {
        assert_eq!(escape_markdown("Fact or Fiction?"), "Fact or Fiction?");
        assert_eq!(
            escape_markdown("Borborygmos (Enraged) - 1.50"),
            "Borborygmos \\(Enraged\\) \\- 1\\.50"
        );
    }

    #[test]
    fn long_messages_split_into_chunks() {
        let lines: Vec<String> = (0..10).map(|i| format!("alert line {}", i)).collect();
        let message = lines.join("\n");
        let chunks = split_message(&message, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40 + "alert line 0\n".len());
        }
        let rejoined: String = chunks.concat();
        for line in &lines {
            assert!(rejoined.contains(line));
        }
    }

    #[test]
    fn short_messages_stay_in_one_chunk() {
        let chunks = split_message("one alert", 4000);
        assert_eq!(chunks.len(), 1);
    }
}
