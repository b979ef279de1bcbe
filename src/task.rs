use std::num::NonZeroU64;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::SharedFormatter;

/// Result text reported when a scoped task exits through an error or a panic.
pub const FAILURE_LABEL: &str = "Exception";

/// Process-unique identity of a [`Task`].
///
/// Formatters key their per-task state by this id. The parent relation is
/// also expressed through ids, so a child never owns or borrows its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static IDS: IdGenerator = IdGenerator::new(1);
        IDS.next()
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Atomic counter that produces unique `TaskId`s without any locking.
#[derive(Debug)]
pub(crate) struct IdGenerator(AtomicU64);

impl IdGenerator {
    pub(crate) const fn new(first: u64) -> Self {
        Self(AtomicU64::new(first))
    }

    pub(crate) fn next(&self) -> TaskId {
        let id = self.0.fetch_add(1, Ordering::Relaxed);
        TaskId(NonZeroU64::new(id).expect("TaskId generation overflow"))
    }
}

/// Lifecycle of a [`Task`]. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Constructed, not begun.
    Pending,
    /// [`Task::begin`] was called.
    Running,
    /// [`Task::success`] or [`Task::fail`] was called.
    Done,
}

/// One unit of work in a tree of tasks.
///
/// A task owns its progress counters and lifecycle state and delegates
/// every piece of output to its [`Formatter`](crate::Formatter).
///
/// ```rust,ignore
/// let mut task = Task::new("Build", formatter).with_total(3);
/// task.begin();
/// task.step("compiling a.c");
/// task.step("compiling b.c");
/// task.step("linking");
/// task.success("done in 3 steps");
/// ```
pub struct Task {
    id: TaskId,
    parent: Option<TaskId>,
    root: TaskId,
    message: String,
    progress: u64,
    total: Option<u64>,
    unit: Option<String>,
    depth: usize,
    state: TaskState,
    formatter: SharedFormatter,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("message", &self.message)
            .field("progress", &self.progress)
            .field("total", &self.total)
            .field("unit", &self.unit)
            .field("depth", &self.depth)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Creates a root task rendered by `formatter`.
    pub fn new(message: impl Into<String>, formatter: SharedFormatter) -> Self {
        let id = TaskId::next();
        Self {
            id,
            parent: None,
            root: id,
            message: message.into(),
            progress: 0,
            total: None,
            unit: None,
            depth: 0,
            state: TaskState::Pending,
            formatter,
        }
    }

    /// Sets the number of steps this task will take. Without a total the
    /// task renders as a plain status line.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Sets the unit shown in the rate, e.g. `files` for `3.50 files/s`.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Creates a child task sharing this task's formatter, one level deeper.
    pub fn subtask(&self, message: impl Into<String>) -> Task {
        Self {
            id: TaskId::next(),
            parent: Some(self.id),
            root: self.root,
            message: message.into(),
            progress: 0,
            total: None,
            unit: None,
            depth: self.depth + 1,
            state: TaskState::Pending,
            formatter: self.formatter.clone(),
        }
    }

    /// Announces the task. Calling it twice renders the start twice.
    pub fn begin(&mut self) {
        if self.state == TaskState::Pending {
            self.state = TaskState::Running;
        }
        self.formatter.begin(self, &self.message);
    }

    /// Advances progress by one and optionally reports a sub-status.
    ///
    /// Progress only moves while a total is set and saturates at the total.
    pub fn step<'a>(&mut self, message: impl Into<Option<&'a str>>) {
        if let Some(total) = self.total
            && self.progress < total
        {
            self.progress += 1;
        }
        if let Some(message) = message.into() {
            self.message(message);
        }
    }

    /// Reports a sub-status line without touching progress.
    pub fn message(&mut self, text: &str) {
        self.formatter.message(self, text);
    }

    /// Marks the task successful. Ignored once the task is done.
    pub fn success<'a>(&mut self, result: impl Into<Option<&'a str>>) {
        if self.is_done() {
            return;
        }
        self.state = TaskState::Done;
        self.formatter.success(self, result.into());
    }

    /// Marks the task failed. Ignored once the task is done.
    pub fn fail<'a>(&mut self, result: impl Into<Option<&'a str>>) {
        if self.is_done() {
            return;
        }
        self.state = TaskState::Done;
        self.formatter.fail(self, result.into());
    }

    /// Begins the task and returns a guard that finishes it when dropped.
    ///
    /// The guard reports success on a normal drop and fails with
    /// [`FAILURE_LABEL`] while unwinding from a panic. An explicit terminal
    /// call through the guard wins, since terminal calls are idempotent.
    pub fn enter(&mut self) -> TaskGuard<'_> {
        self.begin();
        TaskGuard { task: self }
    }

    /// Runs `f` as the body of this task.
    ///
    /// The task begins before `f` runs and reaches exactly one terminal
    /// event afterwards: success when `f` returns `Ok`, failure with
    /// [`FAILURE_LABEL`] when it returns `Err` or panics. The error itself
    /// is returned untouched.
    ///
    /// ```rust,ignore
    /// let mut task = Task::new("fetch", formatter);
    /// let body = task.scope(|task| {
    ///     task.message("connecting");
    ///     fetch()
    /// })?;
    /// ```
    pub fn scope<T, E>(&mut self, f: impl FnOnce(&mut Task) -> Result<T, E>) -> Result<T, E> {
        let mut guard = self.enter();
        let result = f(&mut guard);
        if result.is_err() {
            guard.fail(FAILURE_LABEL);
        }
        result
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The parent task, or `None` for a root task.
    pub fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// The root ancestor; a root task is its own root.
    pub fn root(&self) -> TaskId {
        self.root
    }

    /// The display message given at construction.
    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Nesting depth; 0 for a root task.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TaskState::Done
    }

    pub fn formatter(&self) -> &SharedFormatter {
        &self.formatter
    }
}

/// A running task that finishes itself when dropped. See [`Task::enter`].
pub struct TaskGuard<'a> {
    task: &'a mut Task,
}

impl Deref for TaskGuard<'_> {
    type Target = Task;

    fn deref(&self) -> &Task {
        self.task
    }
}

impl DerefMut for TaskGuard<'_> {
    fn deref_mut(&mut self) -> &mut Task {
        self.task
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.task.fail(FAILURE_LABEL);
        } else {
            self.task.success(None);
        }
    }
}
