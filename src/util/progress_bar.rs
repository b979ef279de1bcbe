use crate::Decoration;

/// A fixed-width progress bar.
///
/// The filled part is `⌊width · done / total⌋` cells of the fill text and
/// the remainder is blank, so the bar keeps its width while it grows.
///
/// ```rust,ignore
/// let bar = ProgressBar::new(45, 100).width(20);
/// write!(f, "{bar}")?;
/// // => [■■■■■■■■■           ]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    done: u64,
    total: u64,
    width: usize,
    decoration: Decoration,
}

const PLAIN: Decoration = Decoration::new("[", "]").with_contents("■");

impl ProgressBar {
    pub fn new(done: u64, total: u64) -> Self {
        Self {
            done,
            total,
            width: 80,
            decoration: PLAIN,
        }
    }

    pub fn width(mut self, w: usize) -> Self {
        self.width = w;
        self
    }

    /// Brackets and fill text. A decoration without contents fills with `■`.
    pub fn decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    /// Number of filled cells. A zero total counts as complete.
    pub fn filled(&self) -> usize {
        if self.total == 0 {
            return self.width;
        }
        let filled = self.width as u128 * self.done as u128 / self.total as u128;
        usize::try_from(filled).map_or(self.width, |filled| filled.min(self.width))
    }
}

impl std::fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = self.filled();
        let fill = self.decoration.contents.unwrap_or("■");
        write!(
            f,
            "{}{}{}{}",
            self.decoration.prefix,
            fill.repeat(filled),
            " ".repeat(self.width - filled),
            self.decoration.suffix,
        )
    }
}
