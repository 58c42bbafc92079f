use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::Print;
use serde_json::Value;
use unicode_width::UnicodeWidthChar;

use super::theme;
use crate::message::{MessageContent, Role};
use crate::session::state::SessionState;

/// A structured payload retained for `:N` viewing.
#[derive(Debug)]
pub struct StoredPayload {
    pub label: String,
    pub pretty: String,
}

/// Draws the chat transcript and produces colored terminal output.
///
/// Rendering is an explicit step: [`Renderer::sync`] draws whatever tail of
/// the message log has not been drawn yet, so callers redraw by calling it
/// after every controller operation — state mutation never implies a redraw
/// on its own.
pub struct Renderer<W: Write = io::Stdout> {
    /// How many log messages have been drawn so far.
    rendered: usize,
    /// Numbered payloads for `:N` viewing.
    payloads: Vec<StoredPayload>,
    /// Writer for output.
    out: W,
}

impl Default for Renderer<io::Stdout> {
    fn default() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Renderer<io::Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> Renderer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            rendered: 0,
            payloads: Vec::new(),
            out: writer,
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn payloads(&self) -> &[StoredPayload] {
        &self.payloads
    }

    // --- Session lifecycle ---

    pub fn render_help(&mut self) {
        let help = ":open <path> to analyze a file · :N view data · type to ask · Ctrl+D exit";
        queue!(self.out, Print(theme::dim().apply(help)), Print("\r\n")).ok();
        self.out.flush().ok();
    }

    /// Draw every log message that has not been drawn yet.
    pub fn sync(&mut self, state: &SessionState) {
        let pending = &state.messages[self.rendered..];
        self.rendered = state.messages.len();
        for message in pending {
            match (&message.role, &message.content) {
                (Role::User, MessageContent::Text(text)) => self.render_user_line(text),
                (Role::Assistant, MessageContent::Text(text)) => self.render_assistant_text(text),
                (_, MessageContent::Json(value)) => self.render_payload_entry(value),
            }
        }
        self.out.flush().ok();
    }

    /// Expand stored payload `n` (1-based) as a pretty-printed tree.
    pub fn view_payload(&mut self, n: usize) {
        let Some(payload) = self.payloads.get(n.wrapping_sub(1)) else {
            self.write_raw(&format!("No data entry {n}\r\n"));
            return;
        };
        let label = format!("[{n}] {}", payload.label);
        let body = payload.pretty.replace('\n', "\r\n");
        queue!(
            self.out,
            Print(theme::data_label().apply(label)),
            Print("\r\n"),
            Print(body),
            Print("\r\n"),
        )
        .ok();
        self.out.flush().ok();
    }

    /// Notice shown while a submission's HTTP call is in flight.
    pub fn render_processing(&mut self, filename: &str) {
        let notice = format!("Processing {filename}... this may take a moment.");
        queue!(
            self.out,
            Print(theme::dim_italic().apply(notice)),
            Print("\r\n"),
        )
        .ok();
        self.out.flush().ok();
    }

    /// Surface an error without touching the message log.
    pub fn render_error(&mut self, error: &str) {
        let text = format!("✗ {error}").replace('\n', "\r\n");
        queue!(self.out, Print(theme::error().apply(text)), Print("\r\n")).ok();
        self.out.flush().ok();
    }

    // --- Prompt ---

    pub fn show_prompt(&mut self) {
        queue!(self.out, Print(theme::prompt_style().apply("> "))).ok();
        self.out.flush().ok();
    }

    /// Show the `> ` prefix when the user starts typing mid-transcript.
    pub fn begin_input_line(&mut self) {
        queue!(self.out, Print(theme::prompt_style().apply("> "))).ok();
        self.out.flush().ok();
    }

    /// Write raw text with `\r\n` line endings already applied.
    pub fn write_raw(&mut self, text: &str) {
        queue!(self.out, Print(text)).ok();
        self.out.flush().ok();
    }

    // --- Internal ---

    fn render_user_line(&mut self, text: &str) {
        let line = format!("> {text}");
        queue!(
            self.out,
            Print(theme::prompt_style().apply(line)),
            Print("\r\n"),
        )
        .ok();
    }

    fn render_assistant_text(&mut self, text: &str) {
        let body = text.replace('\n', "\r\n");
        queue!(self.out, Print(body), Print("\r\n")).ok();
    }

    /// Render a structured payload as a numbered, collapsed entry:
    /// `[N] Lean data (:N to view)  {compact json}` truncated to the
    /// terminal width. `:N` expands it.
    fn render_payload_entry(&mut self, value: &Value) {
        let n = self.payloads.len() + 1;
        let compact = serde_json::to_string(value).unwrap_or_default();
        let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
        self.payloads.push(StoredPayload {
            label: "Lean data".to_string(),
            pretty,
        });

        let line = truncate_line(&format!("[{n}] Lean data (:{n} to view)  {compact}"));
        queue!(
            self.out,
            Print(theme::data_label().apply(line)),
            Print("\r\n"),
        )
        .ok();
    }
}

/// Truncate a string to fit within `max_width` display columns, appending `...` if truncated.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let ellipsis_width = 3; // "..."
    let mut width = 0;
    // Track the byte position where we'd cut for ellipsis
    let mut cut_pos = 0;
    let mut result = String::new();
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            // Need to truncate — use the cut point we've been tracking
            if max_width >= ellipsis_width {
                result.truncate(cut_pos);
                result.push_str("...");
            } else {
                result.clear();
            }
            return result;
        }
        result.push(ch);
        width += ch_width;
        // Track the latest position that leaves room for "..."
        if width <= max_width.saturating_sub(ellipsis_width) {
            cut_pos = result.len();
        }
    }
    result
}

/// Truncate a line to the current terminal width.
fn truncate_line(line: &str) -> String {
    truncate_to_width(line, term_width())
}

/// Query the current terminal width, defaulting to 80.
fn term_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::state::GREETING;
    use serde_json::json;

    /// Strip ANSI escape codes for readable assertions.
    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn rendered(f: impl FnOnce(&mut Renderer<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        let mut renderer = Renderer::with_writer(&mut buf);
        f(&mut renderer);
        strip_ansi(&String::from_utf8(buf).unwrap()).replace('\r', "")
    }

    #[test]
    fn sync_renders_each_message_exactly_once() {
        let mut state = SessionState::default();
        state.push_assistant_text(GREETING);

        let mut buf = Vec::new();
        let mut renderer = Renderer::with_writer(&mut buf);
        renderer.sync(&state);
        renderer.sync(&state); // nothing new — no duplicate output

        state.push_user_text("hi");
        renderer.sync(&state);

        let out = strip_ansi(&String::from_utf8(buf).unwrap()).replace('\r', "");
        assert_eq!(out, format!("{GREETING}\n> hi\n"));
    }

    #[test]
    fn payload_entries_are_numbered_and_stored_pretty() {
        let mut state = SessionState::default();
        state.push_assistant_json(json!({"a": 1}));
        state.push_assistant_json(json!([true]));

        let mut buf = Vec::new();
        let mut renderer = Renderer::with_writer(&mut buf);
        renderer.sync(&state);
        assert_eq!(renderer.payloads().len(), 2);
        assert_eq!(renderer.payloads()[0].pretty, "{\n  \"a\": 1\n}");
        drop(renderer);

        let out = strip_ansi(&String::from_utf8(buf).unwrap());
        assert!(out.contains("[1] Lean data (:1 to view)"));
        assert!(out.contains("[2] Lean data (:2 to view)"));
    }

    #[test]
    fn view_payload_expands_pretty_tree() {
        let mut state = SessionState::default();
        state.push_assistant_json(json!({"a": 1}));

        let out = rendered(|r| {
            r.sync(&state);
            r.view_payload(1);
        });
        assert!(out.contains("[1] Lean data\n{\n  \"a\": 1\n}\n"));
    }

    #[test]
    fn view_payload_out_of_range() {
        let out = rendered(|r| r.view_payload(3));
        assert_eq!(out, "No data entry 3\n");
    }

    #[test]
    fn processing_notice_names_the_file() {
        let out = rendered(|r| r.render_processing("race1.drf"));
        insta::assert_snapshot!(out.trim_end(), @"Processing race1.drf... this may take a moment.");
    }

    #[test]
    fn errors_render_with_marker() {
        let out = rendered(|r| r.render_error("could not reach the analysis workflow"));
        assert_eq!(out, "✗ could not reach the analysis workflow\n");
    }

    #[test]
    fn truncate_to_width_no_truncation() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn truncate_to_width_truncates_with_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
        assert_eq!(truncate_to_width("abcdefghij", 6), "abc...");
    }

    #[test]
    fn truncate_to_width_very_small_max() {
        // max_width < 3 can't even fit "..."
        assert_eq!(truncate_to_width("hello", 2), "");
        assert_eq!(truncate_to_width("hello", 3), "...");
    }

    #[test]
    fn truncate_to_width_wide_chars() {
        // CJK characters are 2 display columns wide
        assert_eq!(truncate_to_width("漢字ab", 10), "漢字ab");
        assert_eq!(truncate_to_width("漢字ab", 5), "漢...");
    }
}
