//! Catalog merge tool
//!
//! Folds scraped JSON into the RON catalog:
//!
//! ```text
//! merge-catalog <catalog.ron> <game-id> <builds.json>
//! merge-catalog <catalog.ron> <game-id> <stats.json> --enrich
//! merge-catalog --export <catalog.ron>
//! ```
//!
//! `builds.json` is a list of classes with their builds. `stats.json` is a
//! list of per-build scrape results. A missing catalog file starts from the
//! built-in catalog.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use buildwheel::catalog::{
    apply_enrichment, default_catalog, export_default_catalog, load_catalog, merge_builds,
    save_catalog, ClassEntry, ScrapeResult,
};

const USAGE: &str =
    "usage: merge-catalog <catalog.ron> <game-id> <input.json> [--enrich]\n       merge-catalog --export <catalog.ron>";

enum Command {
    Merge(Args),
    Export(PathBuf),
}

struct Args {
    catalog: PathBuf,
    game_id: String,
    input: PathBuf,
    enrich: bool,
}

fn parse_args() -> Result<Command> {
    let mut enrich = false;
    let mut export = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--enrich" => enrich = true,
            "--export" => export = true,
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    if export {
        return match positional.pop() {
            Some(path) if positional.is_empty() => Ok(Command::Export(PathBuf::from(path))),
            _ => bail!(USAGE),
        };
    }
    if positional.len() != 3 {
        bail!(USAGE);
    }
    let input = PathBuf::from(positional.remove(2));
    let game_id = positional.remove(1);
    let catalog = PathBuf::from(positional.remove(0));
    Ok(Command::Merge(Args { catalog, game_id, input, enrich }))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn run() -> Result<bool> {
    let args = match parse_args()? {
        Command::Merge(args) => args,
        Command::Export(path) => {
            export_default_catalog(&path)?;
            println!("Wrote built-in catalog to {}", path.display());
            return Ok(true);
        }
    };

    let mut catalog = if args.catalog.exists() {
        load_catalog(&args.catalog)?
    } else {
        log::info!("{} not found, starting from the built-in catalog", args.catalog.display());
        default_catalog()
    };

    let game = catalog
        .game_mut(&args.game_id)
        .with_context(|| format!("game {} is not in the catalog", args.game_id))?;

    let report = if args.enrich {
        let results: Vec<ScrapeResult> = read_json(&args.input)?;
        apply_enrichment(game, &results)
    } else {
        let classes: Vec<ClassEntry> = read_json(&args.input)?;
        merge_builds(game, classes)
    };

    for failure in &report.failures {
        eprintln!("  ! {}", failure);
    }
    println!("{}: {}", args.game_id, report.summary());

    save_catalog(&catalog, &args.catalog)?;
    println!("Wrote {}", args.catalog.display());
    Ok(report.is_clean())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        // Partial merges are saved but still reported as a failure
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
