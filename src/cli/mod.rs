pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use self::commands::{extract, scaffold};

#[derive(Parser)]
#[command(name = "docnet")]
#[command(about = "Documentation model extractor for .NET assemblies", version, author)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the documentation model from one or more assemblies and emit
    /// it as JSON
    Extract {
        /// Input assemblies (.dll/.exe), processed and merged in order
        #[arg(required = true)]
        binaries: Vec<PathBuf>,

        /// Sidecar XML documentation files, matched to binaries by position
        /// (defaults to <binary>.xml when present)
        #[arg(long, value_name = "FILE", num_args = 0..)]
        xml: Vec<PathBuf>,

        /// Referenced assemblies used to resolve base and extended types
        #[arg(long, value_name = "FILE", num_args = 0..)]
        reference: Vec<PathBuf>,

        /// Optional options file (JSON/TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Accessibility levels to include (public, internal, protected,
        /// protected-or-internal, protected-and-internal, private)
        #[arg(long, value_name = "LEVEL", num_args = 0..)]
        visibility: Vec<String>,

        /// Include members inherited from base types
        #[arg(long, default_value_t = false)]
        include_inherited: bool,

        /// Conceptual overlay directory; enables overlay loading
        #[arg(long, value_name = "DIR")]
        conceptual: Option<PathBuf>,

        /// Optional output file path for the model JSON
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Output format: json (compact) or pretty-json (default)
        #[arg(long, value_parser = ["json", "pretty-json"], default_value = "pretty-json")]
        format: String,
    },

    /// Generate the conceptual placeholder file tree for one or more
    /// assemblies
    Scaffold {
        /// Input assemblies (.dll/.exe), processed and merged in order
        #[arg(required = true)]
        binaries: Vec<PathBuf>,

        /// Sidecar XML documentation files, matched to binaries by position
        #[arg(long, value_name = "FILE", num_args = 0..)]
        xml: Vec<PathBuf>,

        /// Referenced assemblies used to resolve base and extended types
        #[arg(long, value_name = "FILE", num_args = 0..)]
        reference: Vec<PathBuf>,

        /// Optional options file (JSON/TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the placeholder tree is written under
        #[arg(long, value_name = "DIR", required = true)]
        target: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            binaries,
            xml,
            reference,
            config,
            visibility,
            include_inherited,
            conceptual,
            out,
            format,
        } => extract::execute(
            binaries,
            xml,
            reference,
            config,
            visibility,
            include_inherited,
            conceptual,
            out,
            format,
        ),

        Commands::Scaffold {
            binaries,
            xml,
            reference,
            config,
            target,
        } => scaffold::execute(binaries, xml, reference, config, target),
    }
}
