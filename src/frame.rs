use std::fmt::Write;

/// Erase from the cursor to the end of the line.
pub(crate) const ERASE_LINE: &str = "\x1b[K";
/// Erase from the cursor to the end of the screen.
pub(crate) const ERASE_BELOW: &str = "\x1b[J";

/// Output of one render, assembled before a single write to the terminal.
///
/// Counts the newlines written through it so the formatter knows how many
/// lines to move back over on the next redraw.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    buf: String,
    lines: usize,
}

impl Frame {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Moves the cursor to column 0 of the line `lines` rows up.
    pub(crate) fn cursor_up(&mut self, lines: usize) {
        if lines > 0 {
            let _ = write!(self.buf, "\x1b[{lines}A\r");
        }
    }

    /// Clears stale characters after the cursor and starts the next line.
    pub(crate) fn end_line(&mut self) {
        self.buf.push_str(ERASE_LINE);
        self.buf.push('\n');
        self.lines += 1;
    }

    pub(crate) fn erase_below(&mut self) {
        self.buf.push_str(ERASE_BELOW);
    }

    /// Lines completed so far.
    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

impl Write for Frame {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.lines += s.bytes().filter(|&b| b == b'\n').count();
        self.buf.push_str(s);
        Ok(())
    }
}
