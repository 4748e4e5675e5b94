//! Pixstack CLI - Versioned Image Editing
//!
//! A thin demonstration front end for the Pixstack library. Operations are applied
//! to one session in the order given on the command line.

use anyhow::{bail, Context, Result};
use pixstack::prelude::*;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let outcome = match args[1].as_str() {
        "filters" => list_filters(args.iter().any(|a| a == "--json")),
        "process" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify input and output paths");
                eprintln!("Usage: {} process <input> <output> [options]", args[0]);
                std::process::exit(2);
            }
            process_image(&args[2..])
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Pixstack v{}", pixstack::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  filters [--json]              List registered filters");
    println!("  process <in> <out> [options]  Edit an image and save the result");
    println!("  help                          Show this help message");
    println!();
    println!("Process options (applied in order):");
    println!("  --config <file>             Load session settings from TOML (must come first)");
    println!("  --grayscale                 Convert to grayscale");
    println!("  --negative                  Invert every channel");
    println!("  --equalize                  Global histogram equalization");
    println!("  --clahe                     Adaptive equalization with configured grid/clip");
    println!("  --scale <alpha> <beta>      Contrast/brightness scaling");
    println!("  --filter <name>             Apply any registered filter with configured settings");
    println!("  --line <x1,y1,x2,y2,w,color> Stage a line (color as RRGGBB or #RRGGBB)");
    println!("  --commit                    Flatten staged lines into the image");
    println!("  --undo                      Undo the last operation");
    println!();
    println!("Outputs without a png/jpg/jpeg/bmp/tiff/gif extension are saved as .jpg");
}

fn list_filters(json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();

    if json {
        println!("{}", serde_json::to_string_pretty(&registry.list())?);
        return Ok(());
    }

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in registry.grouped_by_category() {
        println!("  {}", category.display_name());
        for metadata in filters {
            println!("      {} - {}", metadata.id, metadata.description);
            for param in &metadata.parameters {
                println!("          {}: {}", param.name, param.description);
            }
        }
        println!();
    }

    Ok(())
}

fn process_image(args: &[String]) -> Result<()> {
    let input_path = PathBuf::from(&args[0]);
    let output_path = PathBuf::from(&args[1]);

    let (config, options) = match &args[2..] {
        [flag, file, rest @ ..] if flag == "--config" => {
            let config = SessionConfig::from_file(file)
                .with_context(|| format!("loading config {}", file))?;
            (config, rest)
        }
        rest => (SessionConfig::default(), rest),
    };

    let mut session = EditorSession::with_config(config);
    session
        .load(&input_path)
        .with_context(|| format!("opening {}", input_path.display()))?;

    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--grayscale" => {
                session.grayscale()?;
            }
            "--negative" => {
                session.negative()?;
            }
            "--equalize" => {
                session.equalize_histogram()?;
            }
            "--clahe" => {
                let params = session.config().filters.clahe;
                session.clahe(params)?;
            }
            "--scale" if i + 2 < options.len() => {
                let alpha: f64 = options[i + 1].parse().context("parsing alpha")?;
                let beta: f64 = options[i + 2].parse().context("parsing beta")?;
                session.scale_contrast(ScaleParams::new(alpha, beta))?;
                i += 2;
            }
            "--filter" if i + 1 < options.len() => {
                session.apply_configured(&options[i + 1])?;
                i += 1;
            }
            "--line" if i + 1 < options.len() => {
                let line = parse_line(&options[i + 1])?;
                session.record_line(line.start.0, line.start.1, line.end.0, line.end.1, line.width, line.color);
                i += 1;
            }
            "--commit" => {
                session.commit_overlay()?;
            }
            "--undo" => {
                if !session.can_undo() {
                    bail!("nothing to undo");
                }
                session.undo()?;
            }
            other => bail!("unknown or incomplete option: {}", other),
        }
        i += 1;
    }

    if !session.overlay().is_empty() {
        println!("Committing {} staged line(s)", session.overlay().len());
        session.commit_overlay()?;
    }

    let written = session.save(&output_path)?;
    println!(
        "Saved {} ({} history entries)",
        written.display(),
        session.history().len()
    );
    Ok(())
}

fn parse_line(spec: &str) -> Result<LineRequest> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 6 {
        bail!("expected x1,y1,x2,y2,width,color, got '{}'", spec);
    }

    let coord = |s: &str| -> Result<i32> {
        s.parse()
            .with_context(|| format!("invalid coordinate '{}'", s))
    };

    Ok(LineRequest {
        start: (coord(parts[0])?, coord(parts[1])?),
        end: (coord(parts[2])?, coord(parts[3])?),
        width: parts[4]
            .parse()
            .with_context(|| format!("invalid width '{}'", parts[4]))?,
        color: Color::hex(parts[5]),
    })
}
