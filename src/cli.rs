use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "paddock",
    about = "A chat-style terminal assistant that sends Brisnet DRF race files to an analysis webhook",
    version
)]
pub struct Cli {
    /// Race file to submit for analysis on startup (txt, csv, or drf).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Analysis webhook URL. Overrides MAKE_WEBHOOK_URL and .paddock/config.toml.
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,
}
