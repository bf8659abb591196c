use super::input::{parse_amount, parse_currency};
use super::ui::{self, StyleType};
use crate::converter::Converter;
use crate::core::rates::RateSource;
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;

/// Prints `label` and reads one line. `None` means end of input.
async fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(output, "{}", ui::style_text(label, StyleType::Prompt))?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

struct Request {
    from: String,
    to: String,
    amount: f64,
}

async fn read_request<R, W>(input: &mut R, output: &mut W) -> Result<Option<Result<Request>>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(from) = prompt(input, output, "Source currency: ").await? else {
        return Ok(None);
    };
    let from = match parse_currency(&from) {
        Ok(code) => code,
        Err(e) => return Ok(Some(Err(e.context("Invalid source currency")))),
    };

    let Some(to) = prompt(input, output, "Target currency: ").await? else {
        return Ok(None);
    };
    let to = match parse_currency(&to) {
        Ok(code) => code,
        Err(e) => return Ok(Some(Err(e.context("Invalid target currency")))),
    };

    let Some(amount) = prompt(input, output, "Amount to convert: ").await? else {
        return Ok(None);
    };
    let amount = match parse_amount(&amount) {
        Ok(amount) => amount,
        Err(e) => return Ok(Some(Err(e))),
    };

    Ok(Some(Ok(Request { from, to, amount })))
}

/// Prompts for conversions until end of input. A failed request is reported
/// and the loop carries on with the same cache; only I/O errors end it.
pub async fn run<S, R, W>(converter: &Converter<S>, mut input: R, mut output: W) -> Result<()>
where
    S: RateSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    while let Some(request) = read_request(&mut input, &mut output).await? {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                writeln!(output, "{}", ui::style_text(&format!("{e:#}"), StyleType::Error))?;
                continue;
            }
        };

        match converter
            .convert(&request.from, &request.to, request.amount)
            .await
        {
            Ok(result) => {
                writeln!(output, "{}", ui::style_text(&result.to_string(), StyleType::Result))?
            }
            Err(e) => {
                error!(error = %e, "Conversion failed");
                let message = format!("Error during {}: {e}", e.stage());
                writeln!(output, "{}", ui::style_text(&message, StyleType::Error))?;
            }
        }
    }
    writeln!(output)?;
    Ok(())
}
