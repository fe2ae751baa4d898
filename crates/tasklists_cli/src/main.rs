//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklists_core` linkage.
//! - Seed an in-memory store and print both list orderings with badges.
//! - Keep output deterministic apart from generated ids.

use std::process::ExitCode;
use tasklists_core::db::open_db_in_memory;
use tasklists_core::{
    init_logging_from_config, CoreConfig, FixedClock, RepoError, SortMode,
    SqliteTaskListRepository, TaskListService,
};

const SMOKE_EPOCH_MS: i64 = 1_700_000_000_000;

fn main() -> ExitCode {
    println!("tasklists_core ping={}", tasklists_core::ping());
    println!("tasklists_core version={}", tasklists_core::core_version());

    let config = CoreConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match print_seeded_overview() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smoke run failed [{}]: {err}", err.kind().code());
            ExitCode::FAILURE
        }
    }
}

fn print_seeded_overview() -> Result<(), RepoError> {
    let conn = open_db_in_memory()?;
    let repo = SqliteTaskListRepository::with_clock(&conn, FixedClock(SMOKE_EPOCH_MS))?;
    let service = TaskListService::new(repo);
    service.seed_example_data()?;

    for mode in [SortMode::ByDate, SortMode::ByName] {
        println!("lists sort={}", mode.as_str());
        for row in service.lists_overview(mode)? {
            println!("  [{}] {}", row.badge, row.list.name);
        }
    }
    Ok(())
}
