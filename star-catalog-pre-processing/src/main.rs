/// Star catalog converter main entry point
mod catalog;
mod converter;

use constants::sky::CATALOG_MAGNITUDE_CEILING;
use converter::StarCatalogConverter;
use std::env;
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    max_mag: f64,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut max_mag = CATALOG_MAGNITUDE_CEILING;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--max-mag" {
            let value = iter.next().ok_or("--max-mag requires a value")?;
            max_mag = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid magnitude: {value}"))?;
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or("missing input file")?;
    let output = positional.next();
    if positional.next().is_some() {
        return Err("too many arguments".into());
    }

    Ok(CliArgs {
        input,
        output,
        max_mag,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args[1.min(args.len())..]) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "Usage: {} <input.csv> [output.catalog.json] [--max-mag <value>]",
                args.first().map(String::as_str).unwrap_or("star-catalog-pre-processing")
            );
            std::process::exit(1);
        }
    };

    let converter = StarCatalogConverter::new(&cli.input, cli.output.as_deref(), cli.max_mag);
    converter.convert()?;

    Ok(())
}
