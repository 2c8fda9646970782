use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use maneuver_cmds::{CommandSequence, DIRECTION_SEQUENCE};
use sequence_codegen::{
    block::BlockProgram,
    config::Config,
    header::{check_vocabulary, render_header},
    parser::{find_declaration, parse_names},
};

/// Reads and rewrites the Stampfly direction sequence header
#[derive(Parser, Debug)]
#[command(name = "stampfly-seq", author, version)]
struct Cli {
    /// Firmware directory (default: $WRITE_BASE_DIR or ./firmware)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Header path relative to the firmware directory
    /// (default: $STAMPFLY_HEADER or M5Stampfly/src/direction_sequence.hpp)
    #[arg(long, global = true)]
    header: Option<PathBuf>,

    /// Env file to read instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the sequence currently in the header
    Show,

    /// Print a header for the sequence compiled into this tool
    Builtin,

    /// Replace the sequence in the header, creating the header if needed
    Write(SequenceSource),

    /// Print the statement preview of a block program
    Listing {
        /// Block program, e.g. "take_off forward_1s rotate land"
        #[arg(long)]
        blocks: String,
    },

    /// Check that the header's Direction_t matches this tool's directions
    Check,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SequenceSource {
    /// Direction names, e.g. "RIGHT, FORWARD, FLIP"
    #[arg(long)]
    directions: Option<String>,

    /// Block program, e.g. "take_off right_1s rotate land"
    #[arg(long)]
    blocks: Option<String>,
}

impl SequenceSource {
    fn steps(&self) -> Result<Vec<maneuver_cmds::Direction>> {
        match (&self.directions, &self.blocks) {
            (Some(names), _) => parse_names(names).context("Invalid direction list"),
            (None, Some(program)) => BlockProgram::parse(program)
                .map(|program| program.directions())
                .context("Invalid block program"),
            (None, None) => Err(anyhow!("Either --directions or --blocks is required")),
        }
    }
}

fn init_logger() {
    if std::env::var("RUST_LOG").is_err() {
        Builder::new()
            .filter_level(LevelFilter::Warn)
            .filter_module("sequence_codegen", LevelFilter::Info)
            .filter_module("stampfly_seq", LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }
}

/// Runs one command and returns what should be printed.
fn run(cli: Cli, mut config: Config) -> Result<String> {
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }
    if let Some(header) = cli.header {
        config.header = header;
    }
    let firmware = config.firmware_dir();
    log::debug!("Using {:?}", config);

    let read_header = || -> Result<String> {
        firmware
            .read(&config.header)?
            .with_context(|| format!("{} does not exist", config.header.display()))
    };

    match cli.command {
        Commands::Show => {
            let header = read_header()?;
            let declaration = find_declaration(&header)?;
            let sequence = declaration.sequence();
            Ok(format!("{}\nsteps: {}\n", sequence, sequence.len()))
        }
        Commands::Builtin => Ok(render_header(&DIRECTION_SEQUENCE)),
        Commands::Write(source) => {
            let steps = source.steps()?;
            let sequence = CommandSequence::new(&steps);
            let path = firmware
                .update_sequence(&config.header, &sequence)
                .context("Failed to update the header")?;
            Ok(format!(
                "Wrote {} steps to {}\n",
                sequence.len(),
                path.display()
            ))
        }
        Commands::Listing { blocks } => Ok(BlockProgram::parse(&blocks)?.listing()),
        Commands::Check => {
            check_vocabulary(&read_header()?)?;
            Ok("Direction_t matches\n".to_string())
        }
    }
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let config = match &cli.env_file {
        Some(path) => Config::from_env_file(path)?,
        None => Config::from_env()?,
    };
    print!("{}", run(cli, config)?);
    Ok(())
}
