//! Spinner shown while a long shell command or HTTP call is in flight.

use crate::tui::settings;
use crossterm::cursor::MoveToColumn;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, IsTerminal, Write};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Stops its spinner when finished or dropped.
pub struct ProgressHandle {
    stop: Option<Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ProgressHandle {
    /// No-op handle for non-terminal output and tests.
    pub fn disabled() -> Self {
        Self {
            stop: None,
            thread: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.thread.is_some()
    }

    /// Stop the spinner and clear its line.
    pub fn finish(&mut self) {
        // Dropping the sender wakes the thread even mid-tick.
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Start a spinner on stderr. Returns a disabled handle when stderr is not a TTY.
pub fn start_progress(label: impl Into<String>, color: bool) -> ProgressHandle {
    if !io::stderr().is_terminal() {
        return ProgressHandle::disabled();
    }

    let label = label.into();
    let (stop, stopped) = mpsc::channel::<()>();
    let tick = Duration::from_millis(settings::PROGRESS_TICK_MS);

    let thread = thread::spawn(move || {
        let started = Instant::now();
        let mut err = io::stderr();
        for frame in settings::PROGRESS_FRAMES.iter().cycle() {
            let line = progress_line(*frame, &label, started.elapsed(), color);
            let _ = redraw(&mut err, &line);
            match stopped.recv_timeout(tick) {
                Err(RecvTimeoutError::Timeout) => continue,
                _ => break,
            }
        }
        let _ = redraw(&mut err, "");
    });

    ProgressHandle {
        stop: Some(stop),
        thread: Some(thread),
    }
}

fn redraw(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.queue(MoveToColumn(0))?;
    out.queue(Clear(ClearType::CurrentLine))?;
    write!(out, "{line}")?;
    out.flush()
}

/// `"<frame> <label> 12s"`; only whole seconds are shown.
fn progress_line(frame: char, label: &str, elapsed: Duration, color: bool) -> String {
    let secs = format!("{}s", elapsed.as_secs());
    if color {
        format!(
            "{} {label} {}",
            frame.with(settings::COLOR_PROGRESS_FRAME),
            secs.with(settings::COLOR_PROGRESS_ELAPSED),
        )
    } else {
        format!("{frame} {label} {secs}")
    }
}
