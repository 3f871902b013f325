// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{bail, Context, Result};
use montreal::harmony::ChordCatalog;
use montreal::{CompositionFile, Composer};

fn print_usage() {
    println!("montreal - Algorithmic harmony and melody");
    println!();
    println!("Usage: montreal [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>     Compose from a YAML or TOML composition file");
    println!("  --seed <N>          Override the random seed");
    println!("  --catalog [N]       List the N most consonant chord classes (default 20)");
    println!("  --example           Print the default composition file");
    println!("  --help              Show this help message");
    println!();
    println!("With no --config the default composition is used. Output is a YAML");
    println!("document holding the seed and the composed segments.");
}

fn print_catalog(count: usize) {
    let catalog = ChordCatalog::build();
    println!("{} chord classes, {} usable", catalog.len(), catalog.usable().count());
    for (rank, entry) in catalog.entries().iter().take(count).enumerate() {
        println!(
            "{:>4}  {:<22} {:?}  {:+.3}",
            rank + 1,
            entry.chord_type.to_string(),
            entry.interval_content,
            entry.consonance
        );
    }
}

fn compose(file: &CompositionFile) -> Result<()> {
    let composition = file.validate()?;
    let catalog = ChordCatalog::build();
    let mut composer = Composer::new(&catalog, &composition)?;
    let piece = composer.piece(&composition.segments)?;

    let yaml = serde_yaml::to_string(&piece).context("Failed to serialize composition")?;
    print!("{}", yaml);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let mut file = CompositionFile::default();
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args.get(i + 1).context("--config requires a file path")?;
                file = CompositionFile::load(path)?;
                i += 1;
            }
            "--seed" => {
                let value = args.get(i + 1).context("--seed requires a number")?;
                let parsed = value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid seed: {}", value))?;
                seed = Some(parsed);
                i += 1;
            }
            "--catalog" => {
                let count = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()).unwrap_or(20);
                print_catalog(count);
                return Ok(());
            }
            "--example" => {
                print!("{}", CompositionFile::default().to_yaml()?);
                return Ok(());
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                print_usage();
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    if seed.is_some() {
        file.seed = seed;
    }
    compose(&file)
}
