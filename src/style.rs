/// Decorative strings wrapped around one piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub prefix: &'static str,
    pub suffix: &'static str,
    /// Fill text, used by bars (the repeated cell) and progress (the separator).
    pub contents: Option<&'static str>,
}

impl Decoration {
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            prefix,
            suffix,
            contents: None,
        }
    }

    pub const fn with_contents(mut self, contents: &'static str) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Wraps `text` in this decoration's prefix and suffix.
    pub fn wrap(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        out.push_str(self.prefix);
        out.push_str(text);
        out.push_str(self.suffix);
        out
    }
}

/// The decorations used for a task at one nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Task header, and sub-message lines of the parent depth.
    pub message: Decoration,
    pub success: Decoration,
    pub failure: Decoration,
    /// Wraps the `(n/total, rate)` fragment.
    pub progress: Decoration,
    pub bar: Decoration,
}

const GREEN_RESULT: Decoration = Decoration::new(" \u{1b}[32;1m[✓] ", "");
const RED_RESULT: Decoration = Decoration::new(" \u{1b}[31;1m[x] ", "");
const PROGRESS: Decoration = Decoration::new(" \u{1b}[37;0m(", ")").with_contents("/");
const BAR: Decoration = Decoration::new("\u{1b}[37;1m[", "]").with_contents("■");

/// Styles by nesting depth. Tasks deeper than the table use the last entry.
pub static DEFAULT_STYLES: [Style; 3] = [
    Style {
        message: Decoration::new("\u{1b}[37;1m== ", " \u{1b}[37;1m=="),
        success: GREEN_RESULT,
        failure: RED_RESULT,
        progress: PROGRESS,
        bar: BAR,
    },
    Style {
        message: Decoration::new(" \u{1b}[37;1m[*] \u{1b}[0m", "..."),
        success: GREEN_RESULT,
        failure: RED_RESULT,
        progress: PROGRESS,
        bar: BAR,
    },
    Style {
        message: Decoration::new(" \u{1b}[90;1m*\u{1b}[90;1m ", "..."),
        success: Decoration::new(" \u{1b}[32m[✓] ", ""),
        failure: Decoration::new(" \u{1b}[31m[x] ", ""),
        progress: Decoration::new(" \u{1b}[37;0m(", ")"),
        bar: Decoration::new("\u{1b}[37;0m[", "]").with_contents("■"),
    },
];

/// Returns the style for `depth`, clamped to the last style of `styles`.
///
/// An empty table falls back to [`DEFAULT_STYLES`].
pub fn style_for(styles: &[Style], depth: usize) -> &Style {
    match styles.last() {
        Some(last) => styles.get(depth).unwrap_or(last),
        None => style_for(&DEFAULT_STYLES, depth),
    }
}
