use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use crate::{DIAGNOSTICS, SharedFormatter, Task};

/// A `tracing` [`tracing_subscriber::Layer`] that renders spans as tasks.
pub struct TaskLayer {
    formatter: SharedFormatter,
}

impl TaskLayer {
    /// Creates a layer whose root tasks render through `formatter`.
    pub fn new(formatter: SharedFormatter) -> Self {
        Self { formatter }
    }
}

impl std::fmt::Debug for TaskLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskLayer").finish_non_exhaustive()
    }
}

/// Creates a [`TaskLayer`] rendering through `formatter`.
pub fn task_layer(formatter: SharedFormatter) -> TaskLayer {
    TaskLayer::new(formatter)
}

impl<S> Layer<S> for TaskLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        let message = fields
            .message
            .unwrap_or_else(|| attrs.metadata().name().to_string());

        let parent = span.parent().and_then(|parent| {
            let extensions = parent.extensions();
            extensions
                .get::<SpanTask>()
                .map(|SpanTask(task)| task.subtask(message.clone()))
        });
        let mut task = parent.unwrap_or_else(|| Task::new(message, self.formatter.clone()));
        if let Some(total) = fields.total {
            task = task.with_total(total);
        }
        if let Some(unit) = fields.unit {
            task = task.with_unit(unit);
        }

        task.begin();
        span.extensions_mut().insert(SpanTask(task));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if event.metadata().target().starts_with(DIAGNOSTICS) {
            return;
        }
        let Some(span) = ctx.event_span(event) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        let Some(SpanTask(task)) = extensions.get_mut::<SpanTask>() else {
            return;
        };
        let mut fields = Fields::default();
        event.record(&mut fields);

        let text = fields.message.as_deref();
        if *event.metadata().level() == Level::ERROR {
            task.fail(text);
        } else if fields.step {
            task.step(text);
        } else if let Some(text) = text {
            task.message(text);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let task = span.extensions_mut().remove::<SpanTask>();
        if let Some(SpanTask(mut task)) = task {
            task.success(None);
        }
    }
}

/// The task of a span, stored in the span's extensions.
struct SpanTask(Task);

/// Fields this layer understands on spans and events.
#[derive(Debug, Default)]
struct Fields {
    message: Option<String>,
    total: Option<u64>,
    unit: Option<String>,
    step: bool,
}

impl Visit for Fields {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "total" {
            self.total = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "total" {
            self.total = u64::try_from(value).ok();
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "step" {
            self.step = value;
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "unit" => self.unit = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}
