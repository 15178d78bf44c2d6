use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;

use cue_writer::{write_cue_sheet, CueSheet, CueTrack};
use tracing::debug;

use crate::discover::Item;
use crate::itemlog::ItemLog;
use crate::meta::Identity;
use crate::plan::SegmentPlan;
use crate::time::display_to_cue_index;
use crate::{Config, IdentitySource, ItemError};

const SEGMENT_RULE: &str = "------------------------------";

/// Emit a cue sheet for one item: a header naming performer, album
/// and the (single) audio file, then one TRACK stanza per segment in
/// plan order. On a dry run the sheet is still built and every
/// segment logged, but nothing is written.
pub fn emit_cue(
    config: &Config,
    item: &Item,
    identity: &Identity,
    plan: &[SegmentPlan],
    log: &mut ItemLog,
) -> Result<(), ItemError> {
    let audio_name = item
        .audio_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut sheet = CueSheet::new(&identity.artist, &identity.album, audio_name, "AAC");
    for segment in plan {
        log.say(SEGMENT_RULE)?;
        log.say(&format!(
            "Processing {} from {} to {}",
            segment.title, segment.start_display, segment.end_display
        ))?;
        sheet.push_track(CueTrack {
            number: segment.track,
            title: segment.title.clone(),
            index: display_to_cue_index(&segment.start_display)?,
        });
    }
    if config.dry_run {
        return Ok(());
    }
    let cue_path = config.dir.join(format!("{}.cue", item.base_name));
    let mut file = File::create(&cue_path)?;
    write_cue_sheet(&mut file, &sheet)?;
    log.say(&format!("Wrote cue sheet {}", cue_path.display()))?;
    Ok(())
}

/// Split one item into per-segment files by invoking the transcoder
/// once per segment, stream-copying the audio and injecting tags.
///
/// A nonzero transcoder exit aborts this item's remaining segments;
/// segments already written stay on disk. The caller contains the
/// error at the item boundary so the batch continues.
pub fn emit_split(
    config: &Config,
    item: &Item,
    identity: &Identity,
    plan: &[SegmentPlan],
    log: &mut ItemLog,
) -> Result<(), ItemError> {
    let target_dir = target_dir(config, identity);
    if !config.dry_run {
        // Reuses the directory if an earlier run already made it.
        fs::create_dir_all(&target_dir)?;
        log.say(&format!("Output directory: {}", target_dir.display()))?;
    }
    for segment in plan {
        log.say(SEGMENT_RULE)?;
        log.say(&format!(
            "Processing {} from {} to {}",
            segment.title, segment.start_display, segment.end_display
        ))?;
        if config.dry_run {
            continue;
        }
        log.say(&format!("Output file name: {}", segment.file_name))?;
        let args = transcode_args(&item.audio_path, segment, identity, &target_dir);
        debug!(transcoder = %config.transcoder.display(), ?args, "invoking transcoder");
        let output = Command::new(&config.transcoder).args(&args).output()?;
        let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));
        if !diagnostics.trim().is_empty() {
            log.say(diagnostics.trim_end())?;
        }
        if !output.status.success() {
            return Err(ItemError::Transcode {
                file_name: segment.file_name.clone(),
                status: output.status,
            });
        }
    }
    Ok(())
}

/// Where an item's split files go: `{artist}/{album}` when identity
/// comes from metadata, a flat `{album}` when it was parsed from the
/// filename (whose album label already falls back to the artist).
pub fn target_dir(config: &Config, identity: &Identity) -> PathBuf {
    match config.identity_source {
        IdentitySource::Metadata => config.dir.join(&identity.artist).join(&identity.album),
        IdentitySource::Filename => config.dir.join(&identity.album),
    }
}

/// Argument vector for one transcoder invocation. Pure so the exact
/// command line is testable without the tool installed.
pub fn transcode_args(
    audio_path: &Path,
    segment: &SegmentPlan,
    identity: &Identity,
    target_dir: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(20);
    // -ss/-to must precede -i for input-side seeking on stream copy.
    args.push("-ss".into());
    args.push(segment.start_display.clone().into());
    args.push("-to".into());
    args.push(segment.end_display.clone().into());
    args.push("-i".into());
    args.push(audio_path.as_os_str().to_owned());
    args.push("-c:a".into());
    args.push("copy".into());
    for (key, value) in [
        ("track", segment.track.to_string()),
        ("title", segment.title.clone()),
        ("artist", identity.artist.clone()),
        ("album_artist", identity.artist.clone()),
        ("album", identity.album.clone()),
    ] {
        args.push("-metadata".into());
        args.push(format!("{key}={value}").into());
    }
    args.push("-loglevel".into());
    args.push("warning".into());
    args.push(target_dir.join(&segment.file_name).into_os_string());
    args
}
