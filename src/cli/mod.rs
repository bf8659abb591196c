//! Terminal front end: prompts, one-shot commands and output styling.

pub mod convert;
pub mod input;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;
