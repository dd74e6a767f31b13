//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dynasty_core` linkage.
//! - Print record counts of a document file without modifying it.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `dynasty_cli` or `dynasty_cli inspect <file.dyn>`.
//! Set `DYNASTY_LOG_DIR` (absolute) to write core logs while running.

use dynasty_core::repo::PersistenceResult;
use dynasty_core::{
    Document, Event, Family, MajorEvent, Marriage, Person, Portrait, Record, Repository,
    SqliteRepository, Store,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("DYNASTY_LOG_DIR") {
        if let Err(err) = dynasty_core::init_logging(dynasty_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            println!("dynasty_core ping={}", dynasty_core::ping());
            println!("dynasty_core version={}", dynasty_core::core_version());
            ExitCode::SUCCESS
        }
        [command, path] if command == "inspect" => match inspect(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("inspect failed: {err}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: dynasty_cli [inspect <file>]");
            ExitCode::from(2)
        }
    }
}

fn inspect(path: &str) -> PersistenceResult<()> {
    let document = Document::open(path)?;
    let store = document.store();
    info!("event=cli_inspect module=cli status=start");

    println!("{}={}", Person::TABLE, count::<Person>(store)?);
    println!("{}={}", Marriage::TABLE, count::<Marriage>(store)?);
    println!("{}={}", Event::TABLE, count::<Event>(store)?);
    println!("{}={}", Portrait::TABLE, count::<Portrait>(store)?);
    println!("{}={}", Family::TABLE, count::<Family>(store)?);
    println!("{}={}", MajorEvent::TABLE, count::<MajorEvent>(store)?);

    info!("event=cli_inspect module=cli status=ok");
    Ok(())
}

fn count<R: Record>(store: &Store) -> PersistenceResult<usize> {
    Ok(SqliteRepository::<R>::new(store).get_all()?.len())
}
