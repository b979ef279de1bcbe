//! `tracing` spans rendered as tasks.
//!
//! Each span becomes a task, nested spans become subtasks, `step = true`
//! events advance progress and ERROR events fail the enclosing task.

use std::thread::sleep;
use std::time::Duration;

use task_tally::*;
use tracing::{error, info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    tracing_subscriber::registry()
        .with(task_layer(default_formatter()))
        .init();

    let deploy = info_span!("deploy", message = "deploy v1.4.2");
    deploy.in_scope(|| {
        let upload = info_span!("upload", total = 5_u64, unit = "MB");
        upload.in_scope(|| {
            for part in 1..=5 {
                sleep(Duration::from_millis(250));
                info!(step = true, "part {part}");
            }
        });
        drop(upload);

        let restart = info_span!("restart");
        restart.in_scope(|| {
            for host in ["web-1", "web-2", "web-3"] {
                sleep(Duration::from_millis(300));
                info!("{host} restarted");
            }
            error!("web-3 failed its health check");
        });
    });
}
