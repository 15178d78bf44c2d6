use cue_writer::CueIndex;

/// Format a duration in seconds as `H:MM:SS`, or `D:HH:MM:SS` once it
/// spans a full day. The leading unit is unpadded. Fractional seconds
/// are truncated.
pub fn seconds_to_display(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = total / 3_600 % 24;
    let minutes = total / 60 % 60;
    let secs = total % 60;
    if days > 0 {
        format!("{}:{:02}:{:02}:{:02}", days, hours, minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// Errors parsing an `H:MM:SS` display string into a cue index.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("expected at least H:MM:SS, got {0:?}")]
    TooFewFields(String),

    #[error("non-numeric field {field:?} in {display:?}")]
    BadField { field: String, display: String },

    #[error("seconds field out of range in {0:?}")]
    SecondsOutOfRange(String),
}

/// Convert an `H:MM:SS` (or `D:HH:MM:SS`) display string into a cue
/// sheet index position, folding whole days and hours into the
/// minutes field at 60 minutes per hour: `2:00:00` becomes `120:00`.
pub fn display_to_cue_index(display: &str) -> Result<CueIndex, TimeParseError> {
    let fields: Vec<u64> = display
        .split(':')
        .map(|field| {
            field.parse().map_err(|_| TimeParseError::BadField {
                field: field.to_string(),
                display: display.to_string(),
            })
        })
        .collect::<Result<_, _>>()?;
    if fields.len() < 3 {
        return Err(TimeParseError::TooFewFields(display.to_string()));
    }
    let seconds = fields[fields.len() - 1];
    let mut hours = fields[fields.len() - 3];
    if fields.len() >= 4 {
        hours += fields[fields.len() - 4] * 24;
    }
    let minutes = hours * 60 + fields[fields.len() - 2];
    let seconds = u8::try_from(seconds)
        .map_err(|_| TimeParseError::SecondsOutOfRange(display.to_string()))?;
    Ok(CueIndex::from_minutes_seconds(minutes, seconds))
}
