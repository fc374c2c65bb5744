use serde::{Deserialize, Serialize};

use crate::color_identity::Color;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Card {
    pub id: String,
    pub oracle_id: Option<String>,
    pub name: String,
    pub mana_cost: Option<String>,
    pub cmc: Option<f64>,
    pub type_line: Option<String>,
    pub colors: Option<Vec<Color>>,
    pub color_identity: Option<Vec<Color>>,
    pub set: Option<String>,
    pub set_name: Option<String>,
    pub collector_number: Option<String>,
    #[serde(default)]
    pub prices: Prices,
}

impl Card {
    pub fn label(&self) -> String {
        format!(
            "{} ({} {}) - $ {:.2}",
            self.name,
            self.set
                .clone()
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|| "???".to_string()),
            self.collector_number
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            self.prices.usd.unwrap_or(0) as f64 / 100.0
        )
    }
}

/// Market prices in integer cents. Scryfall serves decimal strings or null;
/// absent and unparseable values both map to `None`, which is distinct from a
/// genuine `Some(0)`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Prices {
    #[serde(with = "price_serde", default)]
    pub usd: Option<u32>,
    #[serde(with = "price_serde", default)]
    pub usd_foil: Option<u32>,
    #[serde(with = "price_serde", default)]
    pub eur: Option<u32>,
    #[serde(with = "price_serde", default)]
    pub tix: Option<u32>,
}

mod price_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(cents: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match cents {
            Some(cents) => serializer.serialize_str(&format!("{}.{:02}", cents / 100, cents % 100)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_cents))
    }

    pub(super) fn parse_cents(raw: &str) -> Option<u32> {
        let value: f64 = raw.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some((value * 100.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_parse_decimal_strings_to_cents() {
        let prices: Prices =
            serde_json::from_str(r#"{"usd":"1.23","usd_foil":"4.00","eur":null}"#).unwrap();
        assert_eq!(prices.usd, Some(123));
        assert_eq!(prices.usd_foil, Some(400));
        assert_eq!(prices.eur, None);
        assert_eq!(prices.tix, None);
    }

    #[test]
    fn malformed_prices_degrade_to_absent() {
        let prices: Prices =
            serde_json::from_str(r#"{"usd":"not a number","usd_foil":"-1.00"}"#).unwrap();
        assert_eq!(prices.usd, None);
        assert_eq!(prices.usd_foil, None);
    }

    #[test]
    fn zero_price_is_distinct_from_absent() {
        let prices: Prices = serde_json::from_str(r#"{"usd":"0.00"}"#).unwrap();
        assert_eq!(prices.usd, Some(0));
        assert_eq!(prices.usd_foil, None);
    }

    #[test]
    fn prices_serialize_back_to_decimal_strings() {
        let prices = Prices {
            usd: Some(105),
            usd_foil: None,
            eur: Some(7),
            tix: None,
        };
        let json = serde_json::to_string(&prices).unwrap();
        assert_eq!(json, r#"{"usd":"1.05","usd_foil":null,"eur":"0.07","tix":null}"#);
    }

    #[test]
    fn card_deserializes_from_api_payload() {
        let card: Card = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "oracle_id": "def-456",
                "name": "Lightning Bolt",
                "mana_cost": "{R}",
                "cmc": 1.0,
                "type_line": "Instant",
                "colors": ["R"],
                "color_identity": ["R"],
                "set": "lea",
                "collector_number": "161",
                "prices": {"usd": "349.99", "usd_foil": null}
            }"#,
        )
        .unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.colors, Some(vec![Color::Red]));
        assert_eq!(card.prices.usd, Some(34999));
        assert!(card.prices.usd_foil.is_none());
    }
}
