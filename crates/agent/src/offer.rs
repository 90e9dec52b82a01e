//! Offer policy and banner

use serde::{Deserialize, Serialize};
use vanguard_config::OfferConfig;

/// Price, purchase URL and the closing sentence appended when the offer is forced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferPolicy {
    price: String,
    url: String,
    closing_template: String,
}

impl OfferPolicy {
    pub fn new(
        price: impl Into<String>,
        url: impl Into<String>,
        closing_template: impl Into<String>,
    ) -> Self {
        Self {
            price: price.into(),
            url: url.into(),
            closing_template: closing_template.into(),
        }
    }

    pub fn from_config(config: &OfferConfig) -> Self {
        Self::new(&config.price, &config.url, &config.closing_template)
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Closing sentence with price and URL filled in
    pub fn closing_sentence(&self) -> String {
        self.closing_template
            .replace("{price}", &self.price)
            .replace("{url}", &self.url)
    }

    /// Make sure `text` carries the purchase link.
    ///
    /// Text that already contains the canonical URL is returned unchanged, so
    /// applying this twice never appends twice. Returns whether text was added.
    pub fn ensure_call_to_action(&self, text: &str) -> (String, bool) {
        if text.contains(self.url.as_str()) {
            return (text.to_string(), false);
        }
        (format!("{}\n\n{}", text, self.closing_sentence()), true)
    }
}

/// Call-to-action panel rendered by the chat UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferBanner {
    pub title: String,
    pub description: String,
    pub price: String,
    pub highlights: Vec<String>,
    pub action_label: String,
    pub action_url: String,
}

impl OfferBanner {
    pub fn from_config(config: &OfferConfig) -> Self {
        Self {
            title: config.banner.title.clone(),
            description: config.banner.description.clone(),
            price: config.banner_price().to_string(),
            highlights: config.banner.highlights.clone(),
            action_label: config.banner.action_label.clone(),
            action_url: config.url.clone(),
        }
    }
}
