use anyhow::{Context, Result};
use clipblocks_config::Config;
use clipblocks_engine::{Conversion, Converter, classify::SourceHint};
use std::{
    env,
    io::{self, Read},
    process,
};

struct Args {
    input: String,
    json: bool,
    html: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--json] [--html] <file|->");
    eprintln!("Reads captured text from a file, or stdin when given '-'.");
    process::exit(1);
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("clipblocks");
    let mut input = None;
    let mut json = false;
    let mut html = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--html" => html = true,
            "-h" | "--help" => usage(program),
            other if input.is_none() => input = Some(other.to_string()),
            _ => usage(program),
        }
    }
    match input {
        Some(input) => Args { input, json, html },
        None => usage(program),
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read '{input}'"))
    }
}

fn print_summary(conversion: &Conversion) {
    let c = &conversion.classification;
    println!("kind: {} ({:.2})", c.kind.name(), c.confidence);
    if let Some(language) = &c.metadata.language {
        println!("language: {language}");
    }
    println!();
    println!("{}", conversion.markup);
    println!();

    let doc = &conversion.document;
    println!(
        "{} blocks in {} request(s)",
        doc.total_blocks(),
        doc.chunks.len()
    );
    for (i, (chunk, validation)) in doc.chunk_slices().zip(&conversion.validations).enumerate() {
        let count: usize = chunk.iter().map(|b| b.flattened_count()).sum();
        let verdict = if validation.is_valid { "ok" } else { "INVALID" };
        println!("  chunk {}: {count} blocks, {verdict}", i + 1);
        for v in &validation.violations {
            println!("    {:?} at {:?} -> {:?}", v.limit, v.path, v.remediation);
        }
    }
    for r in &doc.remediations {
        log::info!("remediated {:?} at {:?} ({:?})", r.limit, r.path, r.remediation);
    }
}

fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.init();

    let args = parse_args();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Fix or remove {} (or point {} elsewhere)",
                Config::location().display(),
                clipblocks_config::CONFIG_ENV
            );
            process::exit(1);
        }
    };

    let mut options = config.convert_options();
    if args.html {
        options.classifier.source_hint = SourceHint::Html;
    }
    let converter = Converter::new(options)?;

    let text = read_input(&args.input)?;
    let conversion = converter.convert(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&conversion.document)?);
    } else {
        print_summary(&conversion);
    }

    if !conversion.is_valid() {
        process::exit(2);
    }
    Ok(())
}
