//! Jump list demo entry point.
//!
//! # Responsibility
//! - Wire a handful of sample items into a builder and publish them.
//! - Print the published snapshot and the known category sizes.
//!
//! Reads `TASKBAR_LOG_LEVEL` and `TASKBAR_LOG_DIR` for logging setup.

use log::warn;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use taskbar_core::{
    default_log_level, init_logging, InMemoryShell, JumpList, KnownCategory, ListItem,
    ShellService,
};

fn main() -> ExitCode {
    let level = env::var("TASKBAR_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = env::var("TASKBAR_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("taskbar_pp").join("logs"));
    if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
        eprintln!("taskbar_pp: logging disabled: {err}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskbar_pp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let shell = InMemoryShell::new();
    if !shell.is_supported() {
        return Err("jump lists are not supported by this shell".into());
    }

    let mut pinned = ListItem::create_with_arguments("56", "Open workspace")?;
    pinned.set_group_name("Workspaces");
    pinned.set_description("Reopen the last workspace")?;

    let mut list = JumpList::new(shell.clone());
    list.add(ListItem::create_with_arguments("12", "newTask")?)
        .add(ListItem::create_separator()?)
        .add(ListItem::create_with_arguments("34", "newTask2")?)
        .add(pinned)
        .add_known_category(KnownCategory::Frequent)
        .add_known_category(KnownCategory::Recent);

    let report = list.commit()?;
    if !report.removed.is_empty() {
        warn!(
            "event=cli_commit module=cli status=ok removed={}",
            report.removed.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&shell.published())?);
    for category in [KnownCategory::Frequent, KnownCategory::Recent] {
        println!("{}={}", category.as_str(), list.items(category)?.len());
    }
    Ok(())
}
