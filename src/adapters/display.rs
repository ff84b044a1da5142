//! Terminal display surface
//!
//! Shows a spinner while a request is in flight and renders the summary as
//! bullet points once the stream settles. In raw mode the text increments
//! are written straight to stdout as they arrive.

use crate::session::{DisplaySurface, RequestState};
use crate::summary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner refresh interval (10 FPS)
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner preview width when the terminal size is unknown
const DEFAULT_PREVIEW_WIDTH: usize = 60;

/// Columns taken by the spinner glyph and bullet count
const PREVIEW_MARGIN: usize = 20;

/// How the summary reaches the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Bullet list once the stream settles, live preview on the spinner
    Bullets,
    /// Raw text written as it streams
    Raw,
}

#[derive(Debug, Default)]
struct Frame {
    text: String,
    printed: usize,
}

/// Display surface drawing to the terminal
pub struct TerminalDisplay {
    mode: RenderMode,
    show_spinner: bool,
    spinner: Mutex<Option<ProgressBar>>,
    frame: Mutex<Frame>,
}

impl TerminalDisplay {
    pub fn new(mode: RenderMode, show_spinner: bool) -> Self {
        Self {
            mode,
            show_spinner,
            spinner: Mutex::new(None),
            frame: Mutex::new(Frame::default()),
        }
    }

    fn start_spinner(&self) {
        if !self.show_spinner {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Summarizing...");
        pb.enable_steady_tick(TICK_INTERVAL);

        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(old) = spinner.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn preview(&self, text: &str) {
        let lines = summary::render(text);
        let Some(last) = lines.last() else {
            return;
        };
        let width = preview_width();
        let mut tail: String = last.chars().take(width).collect();
        if last.chars().count() > width {
            tail.push('…');
        }
        if let Ok(spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.as_ref() {
                pb.set_message(format!("{} | {}", bullet_count(lines.len()), tail.dimmed()));
            }
        }
    }

    fn stream_raw(&self, frame: &mut Frame) {
        // A shorter frame means the summary was cleared for a new request
        if frame.text.len() < frame.printed {
            frame.printed = 0;
        }
        let delta = &frame.text[frame.printed..];
        if delta.is_empty() {
            return;
        }
        let write = |out: &mut dyn Write| -> io::Result<()> {
            out.write_all(delta.as_bytes())?;
            out.flush()
        };
        let result = match self.spinner.lock() {
            Ok(spinner) => match spinner.as_ref() {
                Some(pb) => pb.suspend(|| write(&mut io::stdout())),
                None => write(&mut io::stdout()),
            },
            Err(_) => write(&mut io::stdout()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write summary text");
        }
        frame.printed = frame.text.len();
    }

    fn print_bullets(&self, text: &str) {
        let lines = summary::render(text);
        if lines.is_empty() {
            return;
        }
        println!("\n{}", "Summary".bold().green());
        println!("{}", "-".repeat(60).green());
        for line in lines {
            println!("  {} {}", "•".green(), line);
        }
        println!();
    }
}

impl DisplaySurface for TerminalDisplay {
    fn state_changed(&self, state: RequestState) {
        match state {
            RequestState::InFlight => self.start_spinner(),
            RequestState::Idle => {
                self.stop_spinner();
                let text = self
                    .frame
                    .lock()
                    .map(|f| f.text.clone())
                    .unwrap_or_default();
                match self.mode {
                    RenderMode::Bullets => self.print_bullets(&text),
                    RenderMode::Raw if !text.is_empty() => println!(),
                    RenderMode::Raw => {}
                }
            }
        }
    }

    fn publish(&self, text: &str) {
        let Ok(mut frame) = self.frame.lock() else {
            return;
        };
        frame.text.clear();
        frame.text.push_str(text);

        match self.mode {
            RenderMode::Bullets => {
                drop(frame);
                self.preview(text);
            }
            RenderMode::Raw => self.stream_raw(&mut frame),
        }
    }
}

fn preview_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| (cols as usize).saturating_sub(PREVIEW_MARGIN).max(10))
        .unwrap_or(DEFAULT_PREVIEW_WIDTH)
}

fn bullet_count(n: usize) -> String {
    if n == 1 {
        "1 point".to_string()
    } else {
        format!("{} points", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_count() {
        assert_eq!(bullet_count(1), "1 point");
        assert_eq!(bullet_count(3), "3 points");
    }

    #[test]
    fn test_preview_width_has_floor() {
        assert!(preview_width() >= 10);
    }

    #[test]
    fn test_publish_keeps_latest_frame() {
        let display = TerminalDisplay::new(RenderMode::Bullets, false);
        display.publish("One. Tw");
        display.publish("One. Two.");
        assert_eq!(display.frame.lock().unwrap().text, "One. Two.");
    }

    #[test]
    fn test_raw_mode_tracks_printed_prefix() {
        let display = TerminalDisplay::new(RenderMode::Raw, false);
        display.publish("abc");
        assert_eq!(display.frame.lock().unwrap().printed, 3);

        // Cleared for a new request
        display.publish("");
        display.publish("x");
        assert_eq!(display.frame.lock().unwrap().printed, 1);
    }

    #[test]
    fn test_spinner_lifecycle() {
        let display = TerminalDisplay::new(RenderMode::Bullets, true);
        display.state_changed(RequestState::InFlight);
        assert!(display.spinner.lock().unwrap().is_some());
        display.state_changed(RequestState::Idle);
        assert!(display.spinner.lock().unwrap().is_none());
    }
}
