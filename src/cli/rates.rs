use super::ui::{self, StyleType};
use crate::converter::Converter;
use crate::core::rates::{RateSnapshot, RateSource};
use anyhow::Result;
use comfy_table::Cell;

impl RateSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (1 {})", self.base_currency())),
        ]);

        let mut codes: Vec<_> = self.rates().iter().collect();
        codes.sort_by(|a, b| a.0.cmp(b.0));
        for (code, rate) in codes {
            table.add_row(vec![Cell::new(code), ui::rate_cell(*rate)]);
        }

        let next_update = match self.next_update_at() {
            Some(ts) => format!("Next update: {}", ts.to_rfc2822()),
            None => "Next update: unknown (not cached)".to_string(),
        };

        format!(
            "{}\n{}\n{}",
            ui::style_text(&format!("{} exchange rates", self.base_currency()), StyleType::Title),
            table,
            ui::style_text(&next_update, StyleType::Subtle)
        )
    }
}

/// Prints the full rate table for a base currency.
pub async fn run<S: RateSource>(converter: &Converter<S>, base: &str) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching {} rates...", base.to_uppercase()));
    let snapshot = converter.rates(base).await;
    spinner.finish_and_clear();

    println!("{}", snapshot?.display_as_table());
    Ok(())
}
