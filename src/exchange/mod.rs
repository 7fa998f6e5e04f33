//! Exchange-rate queries.
//!
//! Turns upstream lookups into the text broadcast to clients: a table for
//! the current date, or one summary line per day for a historical range.
//! Lookup failures never abort a query; the error text is rendered in place.

pub mod format;
pub mod types;

pub use format::{day_error_line, day_line, format_date, history_dates, ExchangeTable};
pub use types::{RateEntry, RateRow, RatesResponse};

use chrono::{Local, NaiveDate};
use futures::future::join_all;

use crate::error::LookupError;
use crate::lookup::LookupClient;

/// Rate queries against a single upstream endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    lookup: LookupClient,
    rates_url: String,
}

impl ExchangeService {
    pub fn new(lookup: LookupClient, rates_url: impl Into<String>) -> Self {
        Self {
            lookup,
            rates_url: rates_url.into(),
        }
    }

    /// Upstream URL for one date.
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}?date={}", self.rates_url, format_date(date))
    }

    /// Fetches and parses the rates published for `date`.
    pub async fn rates_for(&self, date: NaiveDate) -> Result<RatesResponse, LookupError> {
        let raw = self.lookup.fetch(&self.url_for(date)).await?;
        RatesResponse::from_json(raw)
    }

    /// Table of today's rates, or the lookup error text.
    pub async fn snapshot(&self) -> String {
        self.snapshot_at(Local::now().date_naive()).await
    }

    pub async fn snapshot_at(&self, today: NaiveDate) -> String {
        match self.rates_for(today).await {
            Ok(response) => ExchangeTable::new(today, &response).to_string(),
            Err(e) => {
                tracing::warn!(error = %e, date = %format_date(today), "Snapshot lookup failed");
                e.to_string()
            }
        }
    }

    /// Summary of the `days` days ending yesterday, one line per day.
    pub async fn historical(&self, days: u8) -> String {
        self.historical_at(days, Local::now().date_naive()).await
    }

    /// Days are fetched concurrently; output stays oldest first. A failed
    /// day renders its error text and the other days are unaffected.
    pub async fn historical_at(&self, days: u8, today: NaiveDate) -> String {
        let dates = history_dates(today, days);
        let lookups = dates.iter().map(|&date| async move {
            match self.rates_for(date).await {
                Ok(response) => day_line(date, &response),
                Err(e) => {
                    tracing::warn!(error = %e, date = %format_date(date), "Historical lookup failed");
                    day_error_line(date, &e)
                }
            }
        });

        join_all(lookups).await.join("\n")
    }
}
