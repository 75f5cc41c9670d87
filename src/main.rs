//! versediff - US/UK edition diff generator

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use versediff::corpus::{self, RunOptions};

#[derive(Parser)]
#[command(name = "versediff")]
#[command(version, about = "Diff US/UK editions of an XML Bible corpus", long_about = None)]
#[command(after_help = "EXAMPLES:
    versediff data out                    Diff every book, write JSON artifacts
    versediff data out --html             Write standalone debug HTML pages
    versediff data out --book 01-Gen.xml  Process a single book")]
struct Cli {
    /// Corpus root containing US/ and UK/ book directories
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for artifacts
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Write standalone debug HTML pages instead of JSON
    #[arg(long)]
    html: bool,

    /// Process only this book file (e.g. 01-Gen.xml)
    #[arg(long, value_name = "FILE")]
    book: Option<String>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    versediff::logging::init(if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    });

    let opts = RunOptions {
        html: cli.html,
        book: cli.book,
    };

    match corpus::run(&cli.input, &cli.output, &opts) {
        Ok(summary) => {
            if !cli.quiet {
                println!(
                    "{} books diffed, {} failed, {} chapters with verse mismatches",
                    summary.books_ok, summary.books_failed, summary.verse_mismatches
                );
            }
            if summary.books_failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
