//! Watch command implementation

use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use arcade_core::{CatalogService, ShutdownReport};
use colored::Colorize;

use crate::commands::list::print_index;
use crate::error::Result;

const POLL: Duration = Duration::from_millis(250);

/// Run the watch command
///
/// Starts the background service and reprints the index whenever its
/// generation changes. Each line on stdin forces a refresh; end of input
/// stops the service.
pub fn run_watch(service: &CatalogService) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("arcade-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if line.is_err() || tx.send(()).is_err() {
                    break;
                }
            }
        })?;

    service.start()?;
    println!(
        "{} {} (Enter refreshes, Ctrl-D quits)",
        "Watching".green().bold(),
        service.config().library_root.display()
    );

    let mut printed: Option<u64> = None;
    let mut seen = 0;
    loop {
        match rx.recv_timeout(POLL) {
            Ok(()) => service.force_refresh(),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        let cycles = service.cycles_completed();
        if cycles > seen {
            seen = cycles;
            reprint(service, &mut printed);
        }
    }

    if printed.is_none() && service.wait_for_cycle(0, service.config().stop_timeout()).is_some() {
        reprint(service, &mut printed);
    }

    if let ShutdownReport::TimedOut { waited } = service.stop() {
        eprintln!(
            "{} catalog worker still busy after {:.1}s",
            "warning:".yellow().bold(),
            waited.as_secs_f64()
        );
    }
    Ok(())
}

fn reprint(service: &CatalogService, printed: &mut Option<u64>) {
    let index = service.current_index();
    if *printed == Some(index.generation()) {
        return;
    }
    *printed = Some(index.generation());
    println!();
    if index.is_empty() {
        println!("{}", "No games found".yellow());
    } else {
        print_index(&index);
    }
}
