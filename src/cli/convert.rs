use super::ui::{self, StyleType};
use crate::converter::Converter;
use crate::core::rates::RateSource;
use anyhow::Result;

/// Converts a single amount and prints the result.
pub async fn run<S: RateSource>(converter: &Converter<S>, from: &str, to: &str, amount: f64) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching {} rates...", from.to_uppercase()));
    let result = converter.convert(from, to, amount).await;
    spinner.finish_and_clear();

    let result = result?;
    println!("{}", ui::style_text(&result.to_string(), StyleType::Result));
    Ok(())
}
