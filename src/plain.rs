use std::fmt::Write as _;
use std::io::{Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crate::{DIAGNOSTICS, Formatter, Task};

/// Appends one timestamped line per event. For logs and pipes.
///
/// ```text
/// [2026-01-02 10:11:12] >> build
/// [2026-01-02 10:11:12]   >> compile
/// [2026-01-02 10:11:13]     a.c
/// [2026-01-02 10:11:14]   SUCCESS
/// [2026-01-02 10:11:14] SUCCESS: 2 files
/// ```
pub struct PlainFormatter<W: Write + Send = Stdout> {
    writer: Mutex<W>,
    date_format: String,
    indent: &'static str,
}

impl Default for PlainFormatter<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl PlainFormatter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> PlainFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            indent: "  ",
        }
    }

    /// `chrono` format string for the leading timestamp.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn print(&self, task: &Task, msg: &str) {
        let mut line = String::new();
        // An invalid date format surfaces as a formatting error, not a panic.
        if write!(line, "[{}] ", chrono::Local::now().format(&self.date_format)).is_err() {
            line.clear();
        }
        line.push_str(&self.indent.repeat(task.depth()));
        line.push_str(msg);
        line.push('\n');
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush());
        drop(writer);
        if let Err(error) = result {
            tracing::warn!(
                target: DIAGNOSTICS,
                %error,
                task = %task.id(),
                "failed to write task output"
            );
        }
    }
}

impl<W: Write + Send> Formatter for PlainFormatter<W> {
    fn begin(&self, task: &Task, msg: &str) {
        self.print(task, &format!(">> {msg}"));
    }

    fn message(&self, task: &Task, msg: &str) {
        self.print(task, &format!("{}{msg}", self.indent));
    }

    fn success(&self, task: &Task, msg: Option<&str>) {
        match msg {
            Some(msg) => self.print(task, &format!("SUCCESS: {msg}")),
            None => self.print(task, "SUCCESS"),
        }
    }

    fn fail(&self, task: &Task, msg: Option<&str>) {
        match msg {
            Some(msg) => self.print(task, &format!("FAIL: {msg}")),
            None => self.print(task, "FAIL"),
        }
    }
}
