//! Parallel subtasks on a tokio runtime sharing one formatter.
//!
//! The formatter serializes renders, so every update is drawn whole. The
//! task that reported last is redrawn in place; the others keep the state
//! they were last drawn with.

use std::sync::Arc;
use std::time::Duration;

use task_tally::*;

#[tokio::main]
async fn main() {
    let formatter: SharedFormatter = Arc::new(
        InteractiveFormatter::stdout().with_config(InteractiveConfig::default().bar_width(40)),
    );

    let mut root = Task::new("sync mirrors", formatter);
    root.begin();

    let mut handles = Vec::new();
    for (i, chunks) in [12_u64, 7, 20].into_iter().enumerate() {
        let mut task = root
            .subtask(format!("mirror {i}"))
            .with_total(chunks)
            .with_unit("chunks");
        let delay = Duration::from_millis(60 + 25 * i as u64);
        handles.push(tokio::spawn(async move {
            task.begin();
            for chunk in 0..chunks {
                tokio::time::sleep(delay).await;
                task.step(format!("chunk {chunk}").as_str());
            }
            task.success(None);
        }));
    }

    for handle in handles {
        if handle.await.is_err() {
            root.fail("a mirror panicked");
        }
    }
    root.success("all mirrors synced");
}
