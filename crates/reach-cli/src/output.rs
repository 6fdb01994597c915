//! Terminal render sink.

use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use reach_monitor::view::sanitize_text;
use reach_monitor::{Counters, LogLine, RenderSink};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::cli::OutputFormat;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws each render pass as a frame on a byte stream.
///
/// Counters are buffered until the log list arrives; the log list closes every
/// render pass, so one pass produces exactly one frame.
pub(crate) struct TerminalSink<W> {
    format: OutputFormat,
    clear_screen: bool,
    state: Mutex<FrameState<W>>,
}

struct FrameState<W> {
    writer: W,
    counters: Option<Counters>,
}

impl TerminalSink<io::Stdout> {
    /// Sink over stdout. Table frames repaint the screen when stdout is a tty.
    pub(crate) fn stdout(format: OutputFormat) -> Self {
        let stdout = io::stdout();
        let clear_screen = format == OutputFormat::Table && stdout.is_terminal();
        Self::new(stdout, format, clear_screen)
    }
}

impl<W: Write> TerminalSink<W> {
    pub(crate) const fn new(writer: W, format: OutputFormat, clear_screen: bool) -> Self {
        Self {
            format,
            clear_screen,
            state: Mutex::new(FrameState {
                writer,
                counters: None,
            }),
        }
    }

    fn frame(&self, counters: &Counters, lines: &[LogLine]) -> String {
        match self.format {
            OutputFormat::Table => table_frame(counters, lines, self.clear_screen),
            OutputFormat::Json => json_frame(counters, lines),
        }
    }
}

#[cfg(test)]
impl TerminalSink<Vec<u8>> {
    /// Frames written so far; JSON frames are one line each.
    pub(crate) fn frames_written(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.writer.iter().filter(|byte| **byte == b'\n').count()
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn set_counters(&self, counters: &Counters) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.counters = Some(counters.clone());
    }

    fn set_log_entries(&self, lines: &[LogLine]) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let counters = state.counters.clone().unwrap_or_else(Counters::error);
        let frame = self.frame(&counters, lines);
        let written = state
            .writer
            .write_all(frame.as_bytes())
            .and_then(|()| state.writer.flush());
        if let Err(err) = written {
            warn!(error = %err, "failed to write status frame");
        }
    }
}

fn table_frame(counters: &Counters, lines: &[LogLine], clear_screen: bool) -> String {
    let mut frame = String::new();
    if clear_screen {
        frame.push_str(CLEAR_SCREEN);
    }
    frame.push_str(&format!(
        "Reach status (refreshed {})\n",
        Local::now().format("%H:%M:%S")
    ));
    for (id, value) in counters.labelled() {
        frame.push_str(&format!("  {id:<20} {}\n", sanitize_text(value)));
    }
    frame.push_str("\nRecent activity\n");
    if lines.is_empty() {
        frame.push_str("  (no entries)\n");
    }
    for line in lines {
        let text = match (&line.time, &line.level) {
            (Some(time), Some(level)) => format!("{time} [{level}] {}", line.text),
            _ => line.text.clone(),
        };
        frame.push_str(&format!("  {}\n", sanitize_text(&text)));
    }
    frame.push('\n');
    frame
}

fn json_frame(counters: &Counters, lines: &[LogLine]) -> String {
    let counters = counters
        .labelled()
        .into_iter()
        .map(|(id, value)| (id.to_string(), Value::from(value)))
        .collect::<Map<_, _>>();
    let logs = lines
        .iter()
        .map(|line| {
            json!({
                "class": line.class,
                "time": line.time,
                "level": line.level,
                "text": line.text,
            })
        })
        .collect::<Vec<_>>();
    let mut frame = json!({ "counters": counters, "logs": logs }).to_string();
    frame.push('\n');
    frame
}
