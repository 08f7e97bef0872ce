//! Interactive search loop.

use passdex_core::lookup::{LookupEngine, LookupOutcome};
use passdex_core::{Config, StoreLayout};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Runs the interactive search loop until stdin closes.
///
/// Empty input re-prompts; every non-empty line triggers exactly one
/// lookup. A failed lookup is printed and the loop continues.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let layout = StoreLayout::open(path, config.create_if_missing)?;
    let engine = LookupEngine::new(&layout, &config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("Password to search: ");
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let key = line.trim_end_matches(['\n', '\r']);
        if key.is_empty() {
            continue;
        }

        let started = Instant::now();
        match engine.lookup(key) {
            Ok(LookupOutcome::Found {
                record,
                segment,
                scanned,
            }) => {
                println!("Found in {segment} after reading {scanned} lines:");
                println!("{}", record.encode());
            }
            Ok(LookupOutcome::NotFound {
                inserted: Some(insert),
            }) => {
                println!("Not found; recorded into {}", insert.segment);
            }
            Ok(LookupOutcome::NotFound { inserted: None }) => {
                println!("Not found; the new record could not be written (see logs)");
            }
            Err(err) => {
                println!("Search failed: {err}");
            }
        }
        println!("Search took {:.2?}", started.elapsed());
    }

    Ok(())
}
