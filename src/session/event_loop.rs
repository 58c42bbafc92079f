use std::io::Write;
use std::path::Path;

use anyhow::Result;
use crossterm::event::Event;
use futures::{Stream, StreamExt};

use crate::display::input::{InputAction, InputHandler};
use crate::display::renderer::Renderer;
use crate::session::controller::{SessionController, SubmitOutcome};
use crate::upload;

/// Why the session loop returned.
pub enum SessionOutcome {
    /// User ended the session (Ctrl+C / Ctrl+D).
    Exited,
    /// The terminal event stream closed.
    EventsClosed,
}

/// Run the interactive chat loop until the user exits.
///
/// Wires terminal key events to controller operations, with an explicit
/// render step after each one. The loop always returns to the prompt —
/// there is no terminal session state.
pub async fn run_session<W, S>(
    controller: &mut SessionController,
    renderer: &mut Renderer<W>,
    input: &mut InputHandler,
    events: &mut S,
    initial_file: Option<&Path>,
) -> Result<SessionOutcome>
where
    W: Write,
    S: Stream<Item = std::io::Result<Event>> + Unpin,
{
    controller.initialize();
    renderer.render_help();
    if !controller.is_configured() {
        renderer.render_error(
            "webhook URL is not configured (set MAKE_WEBHOOK_URL or .paddock/config.toml)",
        );
    }
    renderer.sync(controller.state());

    if let Some(path) = initial_file {
        submit_path(controller, renderer, path).await;
    }

    renderer.show_prompt();
    input.activate();

    while let Some(event) = events.next().await {
        let Ok(Event::Key(key_event)) = event else {
            continue;
        };
        match input.handle_key(&key_event, renderer.writer()) {
            InputAction::None => {}
            InputAction::Activated(c) => {
                renderer.begin_input_line();
                renderer.write_raw(&c.to_string());
            }
            InputAction::Submit(text) => {
                controller.submit_prompt(&text);
                renderer.sync(controller.state());
                renderer.show_prompt();
                input.activate();
            }
            InputAction::Upload(path) => {
                submit_path(controller, renderer, &path).await;
                renderer.show_prompt();
                input.activate();
            }
            InputAction::ViewPayload(n) => {
                renderer.view_payload(n);
                renderer.show_prompt();
                input.activate();
            }
            InputAction::Cancel => {
                renderer.show_prompt();
                input.activate();
            }
            InputAction::Interrupt | InputAction::EndSession => {
                renderer.write_raw("\r\n");
                return Ok(SessionOutcome::Exited);
            }
        }
    }

    Ok(SessionOutcome::EventsClosed)
}

/// Read a file from disk and run it through the controller, surfacing any
/// error at the prompt. Re-selecting the last processed file is silent, so
/// the processing notice only appears when a request will actually fire.
async fn submit_path<W: Write>(
    controller: &mut SessionController,
    renderer: &mut Renderer<W>,
    path: &Path,
) {
    let file = match upload::read_upload(path) {
        Ok(file) => file,
        Err(err) => {
            renderer.render_error(&err.to_string());
            return;
        }
    };

    if controller.already_processed(&file.name) {
        return;
    }

    renderer.render_processing(&file.name);
    match controller.submit_file(&file).await {
        Ok(SubmitOutcome::Analyzed | SubmitOutcome::Duplicate) => {
            renderer.sync(controller.state());
        }
        Err(err) => {
            renderer.render_error(&err.to_string());
        }
    }
    controller.acknowledge_result();
}
