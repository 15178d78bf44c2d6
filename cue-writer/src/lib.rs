use std::fmt;
use std::io::{self, Write};

/// A track index position on a cue sheet, in `MM:SS:FF` form.
///
/// Frames run 0..75 per second; sheets describing chapter marks
/// rather than CD sectors leave them at zero. Minutes are not
/// bounded: sheets for long recordings legitimately exceed 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueIndex {
    pub minutes: u64,
    pub seconds: u8,
    pub frames: u8,
}

impl CueIndex {
    pub fn from_minutes_seconds(minutes: u64, seconds: u8) -> Self {
        Self {
            minutes,
            seconds,
            frames: 0,
        }
    }
}

impl fmt::Display for CueIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}

/// One `TRACK` stanza on a cue sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    /// 1-based track number, printed two-digit zero-padded. Numbers
    /// past 99 widen the field, like [CueIndex] minutes.
    pub number: u32,
    pub title: String,
    /// Position of `INDEX 01`, the track's start.
    pub index: CueIndex,
}

/// A cue sheet for a single audio file.
///
/// Tracks are written in the order they were appended; cue sheets
/// are sequential documents and are never reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub performer: String,
    pub title: String,
    /// Name of the audio file the sheet describes (no directory).
    pub file_name: String,
    /// File type token on the `FILE` line, e.g. `AAC` or `WAVE`.
    pub file_format: String,
    pub tracks: Vec<CueTrack>,
}

impl CueSheet {
    pub fn new(
        performer: impl Into<String>,
        title: impl Into<String>,
        file_name: impl Into<String>,
        file_format: impl Into<String>,
    ) -> Self {
        Self {
            performer: performer.into(),
            title: title.into(),
            file_name: file_name.into(),
            file_format: file_format.into(),
            tracks: Vec::new(),
        }
    }

    pub fn push_track(&mut self, track: CueTrack) {
        self.tracks.push(track);
    }
}

/// Errors that can occur while writing a cue sheet.
#[derive(Debug, thiserror::Error)]
pub enum WriteCueError {
    #[error("IO error writing cue sheet")]
    Io(#[from] io::Error),
}

/// Write a complete cue sheet: the `PERFORMER`/`TITLE`/`FILE` header,
/// then one `TRACK`/`TITLE`/`INDEX 01` stanza per track, in order.
pub fn write_cue_sheet<S: Write>(to: &mut S, sheet: &CueSheet) -> Result<(), WriteCueError> {
    writeln!(to, "PERFORMER \"{}\"", sheet.performer)?;
    writeln!(to, "TITLE \"{}\"", sheet.title)?;
    writeln!(to, "FILE \"{}\" {}", sheet.file_name, sheet.file_format)?;
    for track in &sheet.tracks {
        writeln!(to, "  TRACK {:02} AUDIO", track.number)?;
        writeln!(to, "    TITLE \"{}\"", track.title)?;
        writeln!(to, "    INDEX 01 {}", track.index)?;
    }
    Ok(())
}
