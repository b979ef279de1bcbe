//! Nested, in-place progress reporting for trees of tasks.
//!
//! A [`Task`] is one unit of work. Tasks form a tree through
//! [`Task::subtask`] and forward every lifecycle call to a shared
//! [`Formatter`], which decides what the terminal shows.
//!
//! ```rust,ignore
//! use task_tally::prelude::*;
//!
//! let formatter = default_formatter();
//! let mut build = Task::new("build", formatter);
//! build.scope(|build| -> std::io::Result<()> {
//!     let mut compile = build.subtask("compile").with_total(2);
//!     compile.scope(|compile| {
//!         compile.step("a.c");
//!         compile.step("b.c");
//!         Ok(())
//!     })
//! })?;
//! ```
//!
//! Two formatters ship with the crate: [`InteractiveFormatter`] redraws
//! the most recently updated task in place with ANSI cursor movement, and
//! [`PlainFormatter`] appends one timestamped line per event.

pub(crate) mod error;
pub(crate) mod frame;
pub(crate) mod interactive;
pub(crate) mod mode;
pub(crate) mod plain;
pub(crate) mod state;
pub(crate) mod style;
pub(crate) mod task;
#[cfg(feature = "tracing")]
pub(crate) mod tracing;
pub mod util;


/// Re-exports of all public types and traits.
pub mod prelude {
    pub use crate::Formatter;
    pub use crate::SharedFormatter;
    pub use crate::error::Error;
    pub use crate::interactive::{InteractiveConfig, InteractiveFormatter};
    pub use crate::mode::{FormatterMode, MODE_ENV, default_formatter, formatter_for};
    pub use crate::plain::PlainFormatter;
    pub use crate::state::{MessageRing, RenderState};
    pub use crate::style::{DEFAULT_STYLES, Decoration, Style, style_for};
    pub use crate::task::{FAILURE_LABEL, Task, TaskGuard, TaskId, TaskState};
    #[cfg(feature = "tracing")]
    pub use crate::tracing::{TaskLayer, task_layer};
}

pub use crate::prelude::*;

/// Target of the crate's own diagnostics. The tracing layer ignores it.
pub(crate) const DIAGNOSTICS: &str = "task_tally::diagnostics";

/// A formatter shared by every task of one tree.
pub type SharedFormatter = std::sync::Arc<dyn Formatter>;

/// Turns task lifecycle events into visible output.
///
/// Every [`Task`] forwards its lifecycle to the formatter it was created
/// with, passing itself as context. Implementations own whatever state
/// they need per task and must serialize their own output, since a
/// formatter is shared by all tasks of a tree and those tasks may live
/// on different threads.
///
/// ```rust,ignore
/// struct Silent;
///
/// impl Formatter for Silent {
///     fn begin(&self, _: &Task, _: &str) {}
///     fn message(&self, _: &Task, _: &str) {}
///     fn success(&self, _: &Task, _: Option<&str>) {}
///     fn fail(&self, _: &Task, _: Option<&str>) {}
/// }
/// ```
pub trait Formatter: Send + Sync {
    /// The task has started. `msg` is the task's display message.
    fn begin(&self, task: &Task, msg: &str);

    /// A sub-status line for a running task.
    fn message(&self, task: &Task, msg: &str);

    /// The task finished successfully, with an optional result text.
    fn success(&self, task: &Task, msg: Option<&str>);

    /// The task failed, with an optional result text.
    fn fail(&self, task: &Task, msg: Option<&str>);
}
