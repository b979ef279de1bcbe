use std::fmt::Write as _;
use std::io::{Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::frame::Frame;
use crate::state::RenderState;
use crate::style::{DEFAULT_STYLES, Style, style_for};
use crate::util::ProgressBar;
use crate::{DIAGNOSTICS, Formatter, Task, TaskId};

/// Tunables of the [`InteractiveFormatter`].
///
/// ```rust,ignore
/// let config = InteractiveConfig::default()
///     .max_messages(3)
///     .bar_width(40)
///     .keep_completed(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveConfig {
    pub max_messages: usize,
    pub update_threshold: Duration,
    pub bar_width: usize,
    pub keep_completed: bool,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            max_messages: 5,
            update_threshold: Duration::from_millis(500),
            bar_width: 80,
            keep_completed: true,
        }
    }
}

impl InteractiveConfig {
    /// Sub-messages kept (and shown) per task.
    pub fn max_messages(mut self, n: usize) -> Self {
        self.max_messages = n;
        self
    }

    /// Minimum time between two rate samples of a task.
    pub fn update_threshold(mut self, d: Duration) -> Self {
        self.update_threshold = d;
        self
    }

    /// Progress bar width in columns, brackets excluded.
    pub fn bar_width(mut self, w: usize) -> Self {
        self.bar_width = w;
        self
    }

    /// Whether a finished task keeps showing its sub-messages.
    pub fn keep_completed(mut self, yes: bool) -> Self {
        self.keep_completed = yes;
        self
    }
}

/// One lifecycle event, as applied to a task's render state.
#[derive(Debug, Clone, Copy)]
enum Event<'a> {
    Begin(&'a str),
    Message(&'a str),
    Finish { success: bool, msg: Option<&'a str> },
}

/// Everything one render depends on besides the task itself.
struct Session<W> {
    writer: W,
    states: IndexMap<TaskId, RenderState>,
    last_task: Option<TaskId>,
}

impl<W: Write> Session<W> {
    fn apply(
        &mut self, task: &Task, event: Event<'_>, config: &InteractiveConfig, styles: &[Style],
    ) -> std::io::Result<()> {
        let style = style_for(styles, task.depth());
        let state = self.states.entry(task.id()).or_insert_with(|| {
            let mut state = RenderState::new(task, config.max_messages, config.bar_width);
            state.header = style.message.wrap(task.text());
            state
        });

        match event {
            Event::Begin(msg) => {
                state.header = style.message.wrap(msg);
                self.last_task = Some(task.id());
            }
            Event::Message(msg) => state.messages.push(msg),
            Event::Finish { success, msg } => {
                state.result = match success {
                    true => style.success.wrap(msg.unwrap_or("DONE")),
                    false => style.failure.wrap(msg.unwrap_or("FAIL")),
                };
            }
        }

        let frame = self
            .render(task, Instant::now(), config, styles)
            .map_err(|_| std::io::Error::other("failed to assemble frame"))?;
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()
    }

    /// Builds the output that brings `task` up to date on screen.
    ///
    /// The last rendered task is redrawn in place. Any other task starts a
    /// new block below, leaving earlier output untouched.
    fn render(
        &mut self, task: &Task, now: Instant, config: &InteractiveConfig, styles: &[Style],
    ) -> Result<String, std::fmt::Error> {
        let id = task.id();
        let focused = self.last_task == Some(id);
        let Some(state) = self.states.get_mut(&id) else {
            return Ok(String::new());
        };
        let style = style_for(styles, task.depth());
        let indent = "  ".repeat(task.depth());
        let mut frame = Frame::new();

        if focused {
            frame.cursor_up(state.last_printed);
        }

        write!(frame, "{indent}{}", state.header)?;
        if let Some(total) = task.total() {
            let rate = state.sample_rate(task.progress(), now, config.update_threshold);
            write!(
                frame,
                "{}{:0width$}{}{total}, {rate:.2}{}{}",
                style.progress.prefix,
                task.progress(),
                style.progress.contents.unwrap_or("/"),
                state.unit,
                style.progress.suffix,
                width = state.digits,
            )?;
        }
        frame.write_str(&state.result)?;
        frame.end_line();

        if focused && (config.keep_completed || !task.is_done()) {
            let step_style = style_for(styles, task.depth() + 1);
            for message in state.messages.iter() {
                write!(frame, "{indent}  {}", step_style.message.wrap(message))?;
                frame.end_line();
            }
        }

        if !task.is_done()
            && let Some(total) = task.total()
        {
            let bar = ProgressBar::new(task.progress(), total)
                .width(state.bar_width)
                .decoration(style.bar);
            write!(frame, "{indent}{bar}")?;
            frame.end_line();
        }

        frame.erase_below();
        state.last_printed = frame.lines();
        self.last_task = Some(id);
        Ok(frame.into_string())
    }
}

/// Redraws tasks in place with ANSI cursor movement.
///
/// Every event re-renders the task it concerns: a header line with the
/// optional progress counter and result, the task's recent sub-messages
/// and, while the task runs with a known total, a progress bar. When the
/// same task is updated twice in a row the second render overwrites the
/// first; when another task reports in between, the new render starts
/// below and the earlier lines stay as they were.
///
/// All events are serialized behind one lock, so a formatter can be
/// shared by tasks on several threads.
///
/// ```rust,ignore
/// let formatter: SharedFormatter = Arc::new(
///     InteractiveFormatter::stdout().with_config(InteractiveConfig::default().bar_width(40)),
/// );
/// let mut task = Task::new("download", formatter).with_total(10).with_unit("files");
/// ```
pub struct InteractiveFormatter<W: Write + Send = Stdout> {
    config: InteractiveConfig,
    styles: Vec<Style>,
    session: Mutex<Session<W>>,
    error_handler: Option<Box<dyn Fn(std::io::Error) + Send + Sync>>,
}

impl Default for InteractiveFormatter<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl InteractiveFormatter<Stdout> {
    /// Renders to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> std::fmt::Debug for InteractiveFormatter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.lock();
        f.debug_struct("InteractiveFormatter")
            .field("config", &self.config)
            .field("tasks", &session.states.len())
            .field("last_task", &session.last_task)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> InteractiveFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            config: InteractiveConfig::default(),
            styles: DEFAULT_STYLES.to_vec(),
            session: Mutex::new(Session {
                writer,
                states: IndexMap::new(),
                last_task: None,
            }),
            error_handler: None,
        }
    }

    pub fn with_config(mut self, config: InteractiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the style table. Index `n` styles tasks at depth `n`.
    pub fn with_styles(mut self, styles: Vec<Style>) -> Self {
        self.styles = styles;
        self
    }

    /// Registers a callback invoked when writing a frame fails.
    ///
    /// Without an error handler, write failures are logged at warn level
    /// and otherwise ignored.
    ///
    /// ```rust,ignore
    /// let formatter = InteractiveFormatter::stdout()
    ///     .with_error_handler(|e| eprintln!("progress output failed: {e}"));
    /// ```
    pub fn with_error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(std::io::Error) + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &InteractiveConfig {
        &self.config
    }

    /// A snapshot of the render state of task `id`, if it ever reported.
    pub fn render_state(&self, id: TaskId) -> Option<RenderState> {
        self.lock().states.get(&id).cloned()
    }

    /// The task whose lines are at the bottom of the output.
    pub fn last_task(&self) -> Option<TaskId> {
        self.lock().last_task
    }

    /// Consumes the formatter, returning the underlying writer.
    pub fn into_writer(self) -> W {
        self.session
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    fn lock(&self) -> MutexGuard<'_, Session<W>> {
        // A frame is assembled before it is written, so a panic while
        // holding the lock cannot leave half-applied state behind.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, task: &Task, event: Event<'_>) {
        let result = self.lock().apply(task, event, &self.config, &self.styles);
        if let Err(error) = result {
            match &self.error_handler {
                Some(handler) => handler(error),
                None => tracing::warn!(
                    target: DIAGNOSTICS,
                    %error,
                    task = %task.id(),
                    "failed to write task output"
                ),
            }
        }
    }
}

impl<W: Write + Send> Formatter for InteractiveFormatter<W> {
    fn begin(&self, task: &Task, msg: &str) {
        self.handle(task, Event::Begin(msg));
    }

    fn message(&self, task: &Task, msg: &str) {
        self.handle(task, Event::Message(msg));
    }

    fn success(&self, task: &Task, msg: Option<&str>) {
        self.handle(task, Event::Finish { success: true, msg });
    }

    fn fail(&self, task: &Task, msg: Option<&str>) {
        self.handle(task, Event::Finish {
            success: false,
            msg,
        });
    }
}
