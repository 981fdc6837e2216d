use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Interactive product listing harvester")]
pub struct Cli {
    /// Category name used in output file and folder names (prompted when omitted).
    #[arg(long)]
    pub category: Option<String>,

    /// Site origin for resolving relative links and image URLs (must be http/https).
    #[arg(long, default_value = "https://atris.com.au")]
    pub origin: String,

    /// WebDriver server the browser session connects to.
    #[arg(long, default_value = "http://localhost:9515")]
    pub webdriver: String,

    /// Root directory for the ledger, spreadsheet, JSON and images.
    #[arg(long, default_value = ".")]
    pub out: String,

    /// Seconds to wait for a page body after navigation.
    #[arg(long, default_value_t = 10)]
    pub page_timeout_secs: u64,

    /// Run the browser without a visible window.
    #[arg(long, default_value_t = false)]
    pub headless: bool,
}
