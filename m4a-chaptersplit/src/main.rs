use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use m4a_chaptersplit::{run, Config, Decision, IdentitySource, Mode, Pacer, RunStatus};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the .info.json/.m4a pairs to process.
    /// Split files, cue sheets and the logs/ directory land here too.
    #[arg(short, long)]
    dir: PathBuf,

    /// Generate a cuesheet (.cue) per item instead of split files.
    #[arg(short = 'c', long)]
    gen_cue: bool,

    /// Infer artist/album tags from "Artist - Album - id" filenames
    /// instead of the metadata fields.
    #[arg(long)]
    filename_tags: bool,

    /// Do not write anything to disk (except logs) / dry run.
    #[arg(short = 'n', long)]
    no_write: bool,

    /// Wait this many seconds between items instead of prompting.
    #[arg(
        short,
        long,
        value_name = "SECS",
        num_args = 0..=1,
        default_missing_value = "10"
    )]
    wait: Option<u64>,

    /// Transcoder executable used in split mode.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

/// Sleeps a fixed interval between items.
struct TimedPacer {
    seconds: u64,
}

impl Pacer for TimedPacer {
    fn proceed(&mut self) -> Decision {
        println!("\nWaiting for {} seconds.", self.seconds);
        thread::sleep(Duration::from_secs(self.seconds));
        Decision::Continue
    }
}

/// Prompts between items: Enter continues, 'e' exits, anything else
/// re-prompts. EOF on stdin stops the run.
struct PromptPacer;

impl Pacer for PromptPacer {
    fn proceed(&mut self) -> Decision {
        loop {
            println!("\nPress Enter to continue or input 'e' to exit.");
            print!("\n> ");
            let _ = io::stdout().flush();
            let mut choice = String::new();
            match io::stdin().lock().read_line(&mut choice) {
                Ok(0) | Err(_) => return Decision::Stop,
                Ok(_) => (),
            }
            match choice.trim() {
                "" => return Decision::Continue,
                "e" => return Decision::Stop,
                _ => println!("\nInvalid input."),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging:
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();
    let app_log_layer = tracing_subscriber::fmt::layer().with_target(false).compact();
    tracing_subscriber::registry()
        .with(filter)
        .with(app_log_layer)
        .init();

    let args = Args::parse();
    if !args.dir.is_dir() {
        bail!("{:?} is not a directory", args.dir);
    }
    let config = Config {
        dir: args.dir,
        mode: if args.gen_cue { Mode::Cue } else { Mode::Split },
        identity_source: if args.filename_tags {
            IdentitySource::Filename
        } else {
            IdentitySource::Metadata
        },
        dry_run: args.no_write,
        transcoder: args.ffmpeg,
    };
    let mut pacer: Box<dyn Pacer> = match args.wait {
        Some(seconds) => Box::new(TimedPacer { seconds }),
        None => Box::new(PromptPacer),
    };
    match run(&config, pacer.as_mut()).context("processing the directory")? {
        RunStatus::NothingToDo => println!("Nothing to do."),
        RunStatus::Completed => (),
    }
    Ok(())
}
