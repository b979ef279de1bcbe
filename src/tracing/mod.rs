//! Drive tasks from `tracing` spans.
//!
//! [`TaskLayer`] turns every span into a [`Task`](crate::Task): the span's
//! `message` field (or its name) becomes the task message, and nested spans
//! become subtasks. Events inside a span become sub-messages, events with
//! `step = true` advance progress, and ERROR events fail the task. The task
//! succeeds when its span closes.
//!
//! ```rust,ignore
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! tracing_subscriber::registry()
//!     .with(task_layer(default_formatter()))
//!     .init();
//!
//! let span = tracing::info_span!("compile", total = 2_u64, unit = "files");
//! span.in_scope(|| {
//!     tracing::info!(step = true, "a.c");
//!     tracing::info!(step = true, "b.c");
//! });
//! ```

mod layer;

pub use layer::{TaskLayer, task_layer};
