use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Substring that marks a metadata file, e.g. `Foo.info.json`.
pub const METADATA_MARKER: &str = ".info.json";

/// Extension of the audio sibling each metadata file must have.
pub const AUDIO_EXTENSION: &str = "m4a";

/// One unit of work: a metadata file, its audio sibling, and the base
/// name the two share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub base_name: String,
    pub metadata_path: PathBuf,
    pub audio_path: PathBuf,
}

/// Scan `dir` for metadata/audio pairs, naturally sorted by base name.
///
/// Metadata files without a matching `.m4a` sibling are logged and
/// skipped; they never fail the batch. An empty result is the
/// "nothing to do" case, decided by the caller.
pub fn discover(dir: &Path) -> io::Result<Vec<Item>> {
    let mut items = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.contains(METADATA_MARKER) {
            continue;
        }
        let base_name = name.replace(METADATA_MARKER, "");
        let audio_path = dir.join(format!("{base_name}.{AUDIO_EXTENSION}"));
        if !audio_path.is_file() {
            warn!(
                metadata = %entry.path().display(),
                "no matching {} file found; skipping", AUDIO_EXTENSION
            );
            continue;
        }
        items.push(Item {
            base_name,
            metadata_path: entry.path(),
            audio_path,
        });
    }
    items.sort_by(|a, b| natural_cmp(&a.base_name, &b.base_name));
    Ok(items)
}

/// One alternating digit/non-digit run of a name.
#[derive(Debug, PartialEq, Eq)]
enum Run<'a> {
    Number(u64),
    Text(&'a str),
}

fn runs(s: &str) -> Vec<Run<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.chars().next().map_or(false, |c| c.is_ascii_digit());
        let len = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(len);
        // Digit runs too long for u64 compare as text.
        out.push(match run.parse() {
            Ok(n) if digits => Run::Number(n),
            _ => Run::Text(run),
        });
        rest = tail;
    }
    out
}

/// Natural (human) ordering: digit runs compare numerically, text
/// runs case-insensitively, digits before text at a mismatch.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (left, right) = (runs(a), runs(b));
    for pair in left.iter().zip(right.iter()) {
        let ord = match pair {
            (Run::Number(m), Run::Number(n)) => m.cmp(n),
            (Run::Text(s), Run::Text(t)) => s.to_lowercase().cmp(&t.to_lowercase()),
            (Run::Number(_), Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}
