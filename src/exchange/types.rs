//! Upstream response shapes and rendered rows.

use serde::Deserialize;
use serde_json::Value;

use crate::error::LookupError;

/// Body of the upstream `exchange_rates` endpoint.
///
/// Only the fields the hub renders are modelled; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub exchange_rate: Vec<RateEntry>,
}

impl RatesResponse {
    /// Interprets a raw lookup body. A missing or mistyped `exchangeRate`
    /// list is a [`LookupError::Malformed`].
    pub fn from_json(raw: Value) -> Result<Self, LookupError> {
        serde_json::from_value(raw).map_err(|e| LookupError::Malformed(e.to_string()))
    }

    /// Entries that carry a sale rate, in upstream order.
    pub fn rows(&self) -> Vec<RateRow> {
        self.exchange_rate
            .iter()
            .filter_map(RateEntry::to_row)
            .collect()
    }
}

/// One currency entry as sent by the upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub sale_rate: Option<f64>,

    #[serde(default)]
    pub purchase_rate: Option<f64>,
}

impl RateEntry {
    /// `None` when the entry has no sale rate.
    pub fn to_row(&self) -> Option<RateRow> {
        let sale = self.sale_rate?;
        Some(RateRow {
            currency: self.currency.clone().unwrap_or_else(|| NULL.to_string()),
            sale,
            purchase: self.purchase_rate,
        })
    }
}

/// Placeholder for absent values.
pub const NULL: &str = "null";

/// A renderable (currency, sale, purchase) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub currency: String,
    pub sale: f64,
    pub purchase: Option<f64>,
}

impl RateRow {
    pub fn sale_text(&self) -> String {
        self.sale.to_string()
    }

    pub fn purchase_text(&self) -> String {
        self.purchase
            .map(|p| p.to_string())
            .unwrap_or_else(|| NULL.to_string())
    }

    /// Inline label used by historical summaries.
    pub fn label(&self) -> String {
        format!(
            "{}: sale: {}, purchase: {};",
            self.currency,
            self.sale_text(),
            self.purchase_text()
        )
    }
}
