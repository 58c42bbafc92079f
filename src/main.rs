mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use crossterm::event::EventStream;
use paddock::config;
use paddock::display::RawModeGuard;
use paddock::display::input::InputHandler;
use paddock::display::renderer::Renderer;
use paddock::session::controller::SessionController;
use paddock::session::event_loop;
use paddock::webhook::WebhookClient;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    let file_config = config::load(Path::new("."))?;
    let webhook_url = config::resolve_webhook_url(
        cli.webhook_url,
        config::webhook_url_from_env(),
        &file_config,
    );

    let mut controller = SessionController::new(WebhookClient::new(webhook_url));
    let mut renderer = Renderer::new();
    let mut input = InputHandler::new();
    let mut events = EventStream::new();

    let _raw = RawModeGuard::acquire(true)?;
    event_loop::run_session(
        &mut controller,
        &mut renderer,
        &mut input,
        &mut events,
        cli.file.as_deref(),
    )
    .await?;

    Ok(())
}

/// Install a panic hook that restores terminal state before printing the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        crossterm::terminal::disable_raw_mode().ok();
        default_hook(info);
    }));
}
