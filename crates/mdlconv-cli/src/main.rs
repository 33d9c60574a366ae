#![allow(
    clippy::needless_pass_by_value,    // clap hands over owned paths
    clippy::unnecessary_wraps,         // consistent Result return for CLI handlers
    clippy::must_use_candidate,        // CLI functions don't need must_use
)]

//! mdlconv CLI - 3D model conversion and scene graph inspection
//!
//! With one file the object graph is printed, with two the first file is
//! converted into the second.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use mdlconv_cad::CadLibrary;
use mdlconv_core::{ops, AssetLibrary, LoadOptions, ModelFormat};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Default log filter, `RUST_LOG` takes precedence
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

const AFTER_HELP: &str = "\
With one FILE the object graph is printed (same as `graph`).
With two FILES the first is converted into the second (same as `convert`).";

#[derive(Parser, Debug)]
#[command(name = "mdlconv", version)]
#[command(about = "Convert 3D model files and inspect their scene graphs")]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Do not load texture images after loading a model
    #[arg(long, global = true)]
    no_textures: bool,

    /// Model file to inspect, or input and output files to convert
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the object graph of a model file
    #[command(long_about = "Print the object graph of a model file.\n\
                      \n\
                      Every node is printed as [Type]name, indented two spaces per level.\n\
                      Mesh nodes list their materials, materials their texture properties.")]
    Graph {
        /// Model file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert a model file into another format
    #[command(long_about = "Convert a model file into another format.\n\
                      \n\
                      Formats are chosen by file extension. Both sides are checked\n\
                      before anything is read, so an unsupported output never loads the input.")]
    Convert {
        /// Model file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Model file to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// List known model formats and what can be imported or exported
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    let filter = verbosity.log_filter();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();

    let library = CadLibrary::new();
    let options = LoadOptions::default().with_textures(!args.no_textures);

    let command = match args.command {
        Some(command) => command,
        None => match default_command(args.files) {
            Some(command) => command,
            None => {
                Args::command().print_help()?;
                return Ok(());
            }
        },
    };

    match command {
        Commands::Graph { file } => graph_command(&library, file, &options),
        Commands::Convert { input, output } => {
            convert_command(&library, input, output, &options, verbosity)
        }
        Commands::Formats { json } => formats_command(&library, json),
    }
}

/// Subcommand implied by bare file arguments: one file graphs, two convert
fn default_command(files: Vec<PathBuf>) -> Option<Commands> {
    let mut files = files.into_iter();
    match (files.next(), files.next(), files.next()) {
        (Some(file), None, None) => Some(Commands::Graph { file }),
        (Some(input), Some(output), None) => Some(Commands::Convert { input, output }),
        _ => None,
    }
}

fn graph_command(library: &CadLibrary, file: PathBuf, options: &LoadOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = ops::graph(library, file, options, &mut out) {
        fail(&e);
    }
    Ok(())
}

fn convert_command(
    library: &CadLibrary,
    input: PathBuf,
    output: PathBuf,
    options: &LoadOptions,
    verbosity: Verbosity,
) -> Result<()> {
    if let Err(e) = ops::convert(library, &input, &output, options) {
        fail(&e);
    }
    if verbosity == Verbosity::Verbose {
        eprintln!(
            "{} {} -> {}",
            "Converted".green().bold(),
            input.display(),
            output.display()
        );
    }
    Ok(())
}

/// Print the error as a single line and exit with status 1
fn fail(error: &mdlconv_core::ModelError) -> ! {
    log::debug!("{error:?}");
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(1);
}

#[derive(Debug, Serialize)]
struct FormatEntry {
    id: ModelFormat,
    name: &'static str,
    extension: &'static str,
    import: bool,
    export: bool,
}

fn format_entries<L: AssetLibrary>(library: &L) -> Vec<FormatEntry> {
    ModelFormat::ALL
        .iter()
        .filter_map(|&format| {
            let extension = format.extension()?;
            Some(FormatEntry {
                id: format,
                name: format.name(),
                extension,
                import: library.can_import_extension(extension),
                export: library.can_export_extension(extension),
            })
        })
        .collect()
}

fn formats_command<L: AssetLibrary>(library: &L, json_output: bool) -> Result<()> {
    let entries = format_entries(library);

    if json_output {
        let json = serde_json::json!({
            "formats": entries,
            "library": {
                "import": library.import_extensions(),
                "export": library.export_extensions(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "\n{} {} known model formats:\n",
        "mdlconv".cyan().bold(),
        entries.len()
    )?;
    let header = format!("  {:<6} {:<38} {:<7} {}", "EXT", "NAME", "IMPORT", "EXPORT");
    writeln!(out, "{}", header.bold())?;
    for entry in &entries {
        writeln!(
            out,
            "  {:<6} {:<38} {:<7} {}",
            entry.extension,
            entry.name,
            mark(entry.import),
            mark(entry.export)
        )?;
    }
    writeln!(out)?;
    let imports = library.import_extensions().join(", ");
    let exports = library.export_extensions().join(", ");
    writeln!(out, "{} {imports}", "Library imports:".bold())?;
    writeln!(out, "{} {exports}", "Library exports:".bold())?;
    Ok(())
}

fn mark(supported: bool) -> &'static str {
    if supported {
        "yes"
    } else {
        "no"
    }
}
