use std::io::Write;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::{cursor, queue, terminal};

/// Result of processing a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// No action yet — still editing.
    None,
    /// First character typed while inactive — caller should set up the input line.
    Activated(char),
    /// User submitted free text (a follow-up prompt).
    Submit(String),
    /// User asked to submit a file (`:open <path>` or `:o <path>`).
    Upload(PathBuf),
    /// User wants to expand a stored payload (`:N`).
    ViewPayload(usize),
    /// User cancelled input (Escape).
    Cancel,
    /// User pressed Ctrl-C.
    Interrupt,
    /// User pressed Ctrl-D.
    EndSession,
}

/// Simple line editor for user input in raw mode.
#[derive(Default)]
pub struct InputHandler {
    buffer: String,
    active: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the input handler (start accepting keys).
    pub fn activate(&mut self) {
        self.buffer.clear();
        self.active = true;
    }

    /// Deactivate and clear — used after submit/cancel.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.buffer.clear();
    }

    /// Process a terminal key event, echoing edits to `out`.
    pub fn handle_key<W: Write>(&mut self, event: &KeyEvent, out: &mut W) -> InputAction {
        if !self.active {
            match event.code {
                KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                    return InputAction::Interrupt;
                }
                KeyCode::Char('d') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                    return InputAction::EndSession;
                }
                KeyCode::Char(c) => {
                    // Start input mode — caller handles the visual setup.
                    self.activate();
                    self.buffer.push(c);
                    return InputAction::Activated(c);
                }
                _ => return InputAction::None,
            }
        }

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::Interrupt
            }
            KeyCode::Char('d') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::EndSession
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                queue!(out, crossterm::style::Print(c)).ok();
                out.flush().ok();
                InputAction::None
            }
            KeyCode::Backspace => {
                if !self.buffer.is_empty() {
                    self.buffer.pop();
                    queue!(
                        out,
                        cursor::MoveLeft(1),
                        terminal::Clear(terminal::ClearType::UntilNewLine),
                    )
                    .ok();
                    out.flush().ok();
                }
                InputAction::None
            }
            KeyCode::Enter => {
                let text = self.buffer.clone();
                self.deactivate();

                // Clear the input line so the rendered transcript takes its place.
                queue!(
                    out,
                    crossterm::style::Print("\r"),
                    terminal::Clear(terminal::ClearType::CurrentLine),
                )
                .ok();
                out.flush().ok();

                if text.is_empty() {
                    return InputAction::None;
                }

                if let Some(action) = parse_command(&text) {
                    return action;
                }

                InputAction::Submit(text)
            }
            KeyCode::Esc => {
                self.deactivate();
                queue!(
                    out,
                    crossterm::style::Print("\r"),
                    terminal::Clear(terminal::ClearType::CurrentLine),
                )
                .ok();
                out.flush().ok();
                InputAction::Cancel
            }
            _ => InputAction::None,
        }
    }
}

/// Parse `:`-prefixed commands.
///
/// Accepted forms:
/// - `:N` — expand stored payload N (e.g. `:1`)
/// - `:open <path>` or `:o <path>` — submit a file for analysis
///
/// Anything else (including other `:`-prefixed text) falls through to a
/// plain prompt submission.
fn parse_command(text: &str) -> Option<InputAction> {
    let rest = text.trim().strip_prefix(':')?;
    if rest.is_empty() {
        return None;
    }

    if let Ok(n) = rest.parse::<usize>() {
        return if n > 0 {
            Some(InputAction::ViewPayload(n))
        } else {
            None
        };
    }

    let path = rest
        .strip_prefix("open ")
        .or_else(|| rest.strip_prefix("o "))?
        .trim();
    if path.is_empty() {
        return None;
    }
    Some(InputAction::Upload(PathBuf::from(path)))
}
