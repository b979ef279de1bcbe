//! Rendering helpers shared by the formatters.
//!
//! # Progress bar
//!
//! [`ProgressBar`] renders the fixed-width bar drawn under a task with a
//! known total:
//!
//! ```rust,ignore
//! let bar = ProgressBar::new(3, 10).width(10);
//! writeln!(f, "{bar}")?;
//! // => [■■■       ]
//!
//! // Styled brackets and fill:
//! let bar = ProgressBar::new(3, 10).decoration(style.bar);
//! ```

mod progress_bar;

pub use progress_bar::*;
