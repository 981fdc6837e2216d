#![forbid(unsafe_code)]

pub mod browser;
pub mod cli;
pub mod error;
pub mod extract;
pub mod formats;
pub mod harvest;
pub mod images;
pub mod layout;
pub mod ledger;
pub mod logging;
pub mod prompt;
pub mod rating;
pub mod sheet;
pub mod sink;
