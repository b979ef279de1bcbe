//! A build with nested steps, rendered in place.
//!
//! Set `TASK_TALLY_MODE=plain` (or pipe the output) to get timestamped lines
//! instead.

use std::thread::sleep;
use std::time::Duration;

use owo_colors::OwoColorize;
use task_tally::*;

fn main() -> std::io::Result<()> {
    let mut build = Task::new("build", default_formatter());

    build.scope(|build| {
        let files = ["lexer.c", "parser.c", "codegen.c", "main.c"];
        let mut compile = build
            .subtask("compile")
            .with_total(files.len() as u64)
            .with_unit("files");
        compile.scope(|compile| {
            for file in files {
                sleep(Duration::from_millis(400));
                compile.step(format!("{}", file.cyan()).as_str());
            }
            Ok::<_, std::io::Error>(())
        })?;

        let mut link = build.subtask("link");
        link.scope(|link| {
            link.message("resolving symbols");
            sleep(Duration::from_millis(500));
            link.message("writing target/app");
            sleep(Duration::from_millis(300));
            Ok::<_, std::io::Error>(())
        })?;

        let mut test = build.subtask("test").with_total(3);
        test.begin();
        for name in ["parses", "links", "runs"] {
            sleep(Duration::from_millis(300));
            test.step(name);
        }
        test.fail(format!("{}", "1 of 3 failed".red()).as_str());
        Ok(())
    })
}
