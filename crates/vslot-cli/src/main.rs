//! vslot CLI - export V-Slot hardware parts
//!
//! Builds the parts of a YAML parts config (or the built-in catalog) and
//! writes them as STL meshes, DXF profiles or a JSON recipe document.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vslot::catalog;
use vslot::export::DxfDocument;
use vslot::ir::{ConfigEntry, Document, PartSpec, PartsConfig};

#[derive(Parser)]
#[command(name = "vslot")]
#[command(about = "Parametric V-Slot extrusion hardware", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build parts and write them to a directory
    Export {
        /// Parts config (default: the built-in catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Stl)]
        format: Format,
        /// Only export these entries (repeatable)
        #[arg(long)]
        only: Vec<String>,
    },
    /// Display information about the parts of a config
    Info {
        /// Parts config (default: the built-in catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Entry to describe (default: all)
        name: Option<String>,
    },
    /// List the part types a config may use
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Binary STL, one file per part
    Stl,
    /// DXF profile, one file per extruded part
    Dxf,
    /// One JSON recipe document
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            config,
            output,
            format,
            only,
        } => {
            let config = load_config(config.as_deref())?;
            export_parts(&config, &only, &output, format)?;
        }
        Commands::Info { config, name } => {
            let config = load_config(config.as_deref())?;
            show_info(&config, name.as_deref(), &mut io::stdout().lock())?;
        }
        Commands::List => {
            for name in PartSpec::TYPE_NAMES {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PartsConfig> {
    match path {
        Some(path) => PartsConfig::from_path(path)
            .with_context(|| format!("failed to read parts config {}", path.display())),
        None => Ok(catalog::default_config()?),
    }
}

fn select<'a>(config: &'a PartsConfig, only: &[String]) -> Result<Vec<&'a ConfigEntry>> {
    if only.is_empty() {
        return Ok(config.entries.iter().collect());
    }
    only.iter()
        .map(|name| {
            config
                .get(name)
                .ok_or_else(|| anyhow!("no part named `{name}` in the config"))
        })
        .collect()
}

fn export_parts(config: &PartsConfig, only: &[String], output: &Path, format: Format) -> Result<()> {
    let entries = select(config, only)?;
    if entries.is_empty() {
        bail!("Config has no parts to export");
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    match format {
        Format::Stl => {
            for entry in entries {
                let part = catalog::build(&entry.spec)
                    .with_context(|| format!("failed to build {}", entry.name))?
                    .with_name(entry.name.clone());
                let path = output.join(format!("{}.stl", entry.name));
                part.write_stl(&path)?;
                println!(
                    "Exported {} ({} triangles) to {}",
                    entry.name,
                    part.num_triangles(),
                    path.display()
                );
            }
        }
        Format::Dxf => {
            for entry in entries {
                let Some(sketch) = catalog::profile(&entry.spec)
                    .with_context(|| format!("failed to build {}", entry.name))?
                else {
                    tracing::warn!(
                        entry = %entry.name,
                        kind = entry.spec.type_name(),
                        "no 2D profile, skipping"
                    );
                    continue;
                };
                let mut doc = DxfDocument::new();
                doc.add_sketch(&sketch);
                let path = output.join(format!("{}.dxf", entry.name));
                doc.export(&path)?;
                println!("Exported {} profile to {}", entry.name, path.display());
            }
        }
        Format::Json => {
            let mut doc = Document::new();
            for entry in entries {
                doc.push(entry.name.clone(), entry.spec.clone(), entry.spec.default_color());
            }
            let path = output.join("parts.json");
            fs::write(&path, doc.to_json()?)?;
            println!("Exported {} recipes to {}", doc.parts.len(), path.display());
        }
    }

    Ok(())
}

fn show_info(config: &PartsConfig, name: Option<&str>, out: &mut impl Write) -> Result<()> {
    let only: Vec<String> = name.into_iter().map(str::to_string).collect();
    for entry in select(config, &only)? {
        writeln!(out, "{} ({})", entry.name, entry.spec.type_name())?;
        match catalog::build(&entry.spec) {
            Ok(part) => {
                let (min, max) = part.bounding_box();
                writeln!(out, "  Material: {}", part.material().key())?;
                writeln!(out, "  Triangles: {}", part.num_triangles())?;
                writeln!(out, "  Volume: {:.2} mm^3", part.volume())?;
                writeln!(out, "  Surface area: {:.2} mm^2", part.surface_area())?;
                writeln!(
                    out,
                    "  Bounds: [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
                    min[0], min[1], min[2], max[0], max[1], max[2]
                )?;
                if !part.joints().is_empty() {
                    let labels: Vec<&str> =
                        part.joints().iter().map(|j| j.label.as_str()).collect();
                    writeln!(out, "  Joints: {}", labels.join(", "))?;
                }
            }
            Err(e) => {
                writeln!(out, "  Failed to build: {}", e)?;
            }
        }
    }
    Ok(())
}
