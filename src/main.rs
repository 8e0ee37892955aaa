use std::io::stdin;
use std::process;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;

use klack::config::{Config, TextSource};
use klack::error::Error;
use klack::runtime::StdinKeySource;
use klack::session;
use klack::terminal::{self, RawTerminal};
use klack::text::TextProvider;

/// Terminal typing trainer with corrected and raw accuracy tracking
#[derive(Parser, Debug)]
#[command(name = "klack", about, disable_version_flag = true)]
struct Cli {
    /// Timed mode: type for N seconds (wins over --words)
    #[arg(short, long, value_name = "N")]
    time: Option<u64>,

    /// Word count mode: complete N words, untimed
    #[arg(short, long, value_name = "N")]
    words: Option<usize>,

    /// Text source to practice against
    #[arg(short, long, value_enum, default_value = "words")]
    source: TextSource,

    /// Print version information
    #[arg(short = 'v', long)]
    version: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!(
            "{} {} (commit: {}, built: {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            option_env!("KLACK_COMMIT").unwrap_or("none"),
            option_env!("KLACK_BUILD_DATE").unwrap_or("unknown"),
        );
        return;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(err) = run(cli) {
        // the terminal guard has already restored the screen
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = Config::resolve(cli.source, cli.time, cli.words)?;
    let provider = TextProvider::new(config)?;
    let width = terminal::validated_width()?;

    let _guard = RawTerminal::acquire()?;
    let keys = StdinKeySource::spawn();

    session::run(&config, &provider, &keys, width)
}
