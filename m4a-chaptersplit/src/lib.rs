//! Split m4a files into per-chapter tracks (or generate a cue sheet)
//! using the chapter marks in a sibling `.info.json` document, as
//! written by yt-dlp and friends.
//!
//! The pipeline is strictly sequential: items one at a time, segments
//! within an item one at a time. Between items the driver consults a
//! [Pacer], at a boundary where the item's log is closed and no
//! partial writes are outstanding. Everything recoverable (missing
//! audio sibling, missing chapters, unparseable filename identity, a
//! failed transcode) is logged and contained at the item boundary;
//! only a bad source directory fails the run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use anyhow::Context;
use tracing::{info, instrument, warn};

pub mod discover;
pub mod emit;
pub mod itemlog;
pub mod meta;
pub mod plan;
pub mod slug;
pub mod time;

pub use discover::{discover, Item};
pub use itemlog::ItemLog;
pub use meta::{BookMeta, Identity, IdentityError};
pub use plan::{build_plan, NoChapters, SegmentPlan};
pub use slug::slugify;

/// What to produce per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Per-chapter files via the external transcoder.
    Split,
    /// A `.cue` sheet next to the sources.
    Cue,
}

/// Where artist/album labels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Metadata,
    Filename,
}

/// Immutable run configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the `.info.json`/`.m4a` pairs. Outputs and
    /// `logs/` land here too.
    pub dir: PathBuf,
    pub mode: Mode,
    pub identity_source: IdentitySource,
    /// Plan and log everything, write nothing but logs.
    pub dry_run: bool,
    /// The transcoder executable, normally `ffmpeg` on PATH.
    pub transcoder: PathBuf,
}

/// Anything that can end one item's processing early. All variants
/// are logged and contained at the item boundary.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    NoChapters(#[from] NoChapters),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("transcoder exited with {status} while producing {file_name:?}")]
    Transcode {
        file_name: String,
        status: ExitStatus,
    },

    #[error("bad timestamp for a cue index")]
    CueIndex(#[from] time::TimeParseError),

    #[error("couldn't write cue sheet")]
    CueSheet(#[from] cue_writer::WriteCueError),

    #[error("couldn't parse metadata document")]
    Metadata(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] io::Error),
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Discovery found no eligible items. A success, distinct so the
    /// caller can report it.
    NothingToDo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop,
}

/// The "continue?" policy consulted between items. Implementations
/// (timed sleep, interactive prompt) live with the caller; the
/// pipeline only promises to ask at a clean item boundary.
pub trait Pacer {
    fn proceed(&mut self) -> Decision;
}

/// Always continues. The policy for unattended runs and tests.
pub struct Uninterrupted;

impl Pacer for Uninterrupted {
    fn proceed(&mut self) -> Decision {
        Decision::Continue
    }
}

/// Process every discovered item in the configured directory,
/// consulting `pacer` between items.
pub fn run(config: &Config, pacer: &mut dyn Pacer) -> anyhow::Result<RunStatus> {
    let items =
        discover(&config.dir).with_context(|| format!("scanning {:?}", config.dir))?;
    if items.is_empty() {
        return Ok(RunStatus::NothingToDo);
    }
    let mut failed = 0usize;
    let mut item_iter = items.iter().peekable();
    while let Some(item) = item_iter.next() {
        // Per-item failures are already reported through the item log.
        if process_item(config, item).is_err() {
            failed += 1;
        }
        if item_iter.peek().is_some() && pacer.proceed() == Decision::Stop {
            info!("stopping at user request");
            break;
        }
    }
    if failed > 0 {
        warn!(failed, "some items were skipped or failed");
    }
    Ok(RunStatus::Completed)
}

/// Process one item end to end: load metadata, resolve identity,
/// build the segment plan, emit. The item log is flushed on every
/// exit path; the error (if any) is recorded in it before return.
#[instrument(skip_all, fields(item = %item.base_name))]
pub fn process_item(config: &Config, item: &Item) -> Result<(), ItemError> {
    let mut log = ItemLog::open(&config.dir, &item.base_name)?;
    let result = process_segments(config, item, &mut log);
    if let Err(err) = &result {
        let _ = log.say(&format!("Skipping {}: {}", item.base_name, err));
    }
    log.finish()?;
    result
}

fn process_segments(config: &Config, item: &Item, log: &mut ItemLog) -> Result<(), ItemError> {
    let meta = BookMeta::load(&item.metadata_path)?;
    let identity = match config.identity_source {
        IdentitySource::Metadata => Identity::from_metadata(&meta),
        IdentitySource::Filename => Identity::from_base_name(&item.base_name)?,
    };
    log.say("==============================")?;
    log.say(&format!("Processing {}", identity.album))?;
    let plan = build_plan(meta.chapters.as_deref())?;
    match config.mode {
        Mode::Cue => emit::emit_cue(config, item, &identity, &plan, log),
        Mode::Split => emit::emit_split(config, item, &identity, &plan, log),
    }
}
