//! Text rendering for snapshot tables and historical summaries.

use std::fmt;

use chrono::{Days, NaiveDate};

use super::types::{RateRow, RatesResponse};

/// Date format used by the upstream `date` parameter and all rendered labels.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The `days` calendar days ending the day before `today`, oldest first.
pub fn history_dates(today: NaiveDate, days: u8) -> Vec<NaiveDate> {
    (1..=u64::from(days))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Rates for a single date, rendered as a text table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeTable {
    pub date: NaiveDate,
    pub rows: Vec<RateRow>,
}

impl ExchangeTable {
    pub fn new(date: NaiveDate, response: &RatesResponse) -> Self {
        Self {
            date,
            rows: response.rows(),
        }
    }
}

const HEADERS: [&str; 3] = ["Currency", "Sale", "Purchase"];

impl fmt::Display for ExchangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 3]> = self
            .rows
            .iter()
            .map(|r| [r.currency.clone(), r.sale_text(), r.purchase_text()])
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        writeln!(f, "Exchange rates {}", format_date(self.date))?;
        write_row(f, &HEADERS.map(String::from), &widths)?;
        writeln!(f)?;
        let rule = widths.map(|w| "-".repeat(w + 2));
        write!(f, "|{}|", rule.join("|"))?;
        for row in &cells {
            writeln!(f)?;
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 3], widths: &[usize; 3]) -> fmt::Result {
    for (cell, width) in cells.iter().zip(widths) {
        write!(f, "| {cell:<width$} ", width = *width)?;
    }
    write!(f, "|")
}

/// One historical summary line: `DD.MM.YYYY: CUR: sale: X, purchase: Y; ...`.
pub fn day_line(date: NaiveDate, response: &RatesResponse) -> String {
    let labels: Vec<String> = response.rows().iter().map(RateRow::label).collect();
    if labels.is_empty() {
        format!("{}:", format_date(date))
    } else {
        format!("{}: {}", format_date(date), labels.join(" "))
    }
}

/// Historical line for a day whose lookup failed.
pub fn day_error_line(date: NaiveDate, error: &impl fmt::Display) -> String {
    format!("{}: {}", format_date(date), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> RatesResponse {
        RatesResponse::from_json(json!({
            "exchangeRate": [
                { "currency": "USD", "saleRate": 15.7, "purchaseRate": 15.35 },
                { "currency": "CHF", "saleRateNB": 16.0 },
                { "currency": "EUR", "saleRate": 19.2, "purchaseRate": null }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_history_dates_end_yesterday_oldest_first() {
        let dates = history_dates(date(2024, 3, 10), 3);
        assert_eq!(dates, vec![date(2024, 3, 7), date(2024, 3, 8), date(2024, 3, 9)]);
    }

    #[test]
    fn test_history_dates_cross_month_boundary() {
        let dates = history_dates(date(2024, 3, 2), 2);
        assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn test_table_renders_rows_with_sale_rate_only() {
        let table = ExchangeTable::new(date(2024, 3, 10), &sample());
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Exchange rates 10.03.2024");
        assert_eq!(lines[1], "| Currency | Sale | Purchase |");
        assert_eq!(lines[2], "|----------|------|----------|");
        assert_eq!(lines[3], "| USD      | 15.7 | 15.35    |");
        assert_eq!(lines[4], "| EUR      | 19.2 | null     |");
        assert_eq!(lines.len(), 5);
        assert!(!text.contains("CHF"));
    }

    #[test]
    fn test_day_line() {
        let line = day_line(date(2024, 3, 7), &sample());
        assert_eq!(
            line,
            "07.03.2024: USD: sale: 15.7, purchase: 15.35; EUR: sale: 19.2, purchase: null;"
        );
    }

    #[test]
    fn test_day_error_line() {
        let line = day_error_line(date(2024, 3, 8), &crate::LookupError::Timeout);
        assert_eq!(line, "08.03.2024: HTTP request timed out.");
    }
}
