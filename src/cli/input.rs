use anyhow::{Result, anyhow, bail};

/// Validates a currency code and returns it uppercased.
pub fn parse_currency(input: &str) -> Result<String> {
    let code = input.trim();
    if code.is_empty() {
        bail!("Currency code must not be empty");
    }
    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid currency code: {code}");
    }
    Ok(code.to_ascii_uppercase())
}

/// Parses a strictly positive, finite amount.
pub fn parse_amount(input: &str) -> Result<f64> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid amount: {}", input.trim()))?;
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be positive");
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency(" usd\n").unwrap(), "USD");
        assert_eq!(parse_currency("EUR").unwrap(), "EUR");
        assert!(parse_currency("").is_err());
        assert!(parse_currency("   ").is_err());
        assert!(parse_currency("U5D").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), 100.0);
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }
}
