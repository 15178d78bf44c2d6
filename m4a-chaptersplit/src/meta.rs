use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::slug::slugify;
use crate::ItemError;

/// One chapter mark, taken verbatim from the metadata document. No
/// ordering or range validation happens here; tracks follow the input
/// order even if that order is not chronological.
#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub start_time: f64,
    pub end_time: f64,
    pub title: String,
}

/// The parsed `.info.json` document, reduced to the fields this tool
/// reads. Downloaders emit `chapters: null` (or something that is not
/// an array at all) for sources without chapter marks; that
/// deserializes to `None` rather than failing the item.
#[derive(Debug, Clone, Deserialize)]
pub struct BookMeta {
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "chapters_lenient")]
    pub chapters: Option<Vec<Chapter>>,
}

impl BookMeta {
    pub fn load(path: &Path) -> Result<Self, ItemError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn chapters_lenient<'de, D>(deserializer: D) -> Result<Option<Vec<Chapter>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(serde::de::Error::custom))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

/// Artist and album labels for one item, already slugified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub artist: String,
    /// An album label that slugifies to nothing falls back to the
    /// artist label, in both derivation modes.
    pub album: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("base name {0:?} has no \" - \" separator between artist and album")]
    MissingSeparator(String),
}

impl Identity {
    /// Derive identity from metadata fields, preferring `creator`
    /// over `uploader`.
    pub fn from_metadata(meta: &BookMeta) -> Self {
        let artist_raw = meta
            .creator
            .as_deref()
            .or(meta.uploader.as_deref())
            .unwrap_or_default();
        let artist = slugify(artist_raw, &[], true);
        let album = Self::album_or_artist(slugify(&meta.title, &[], true), &artist);
        Identity { artist, album }
    }

    fn album_or_artist(album: String, artist: &str) -> String {
        if album.is_empty() {
            artist.to_string()
        } else {
            album
        }
    }

    /// Derive identity from a `Artist - Album - uniqueid` base name:
    /// the segment after the last hyphen is a downloader-appended id
    /// and is discarded, the rest splits on the first `" - "`.
    pub fn from_base_name(base_name: &str) -> Result<Self, IdentityError> {
        let tag = match base_name.rsplit_once('-') {
            Some((head, _id)) => head,
            None => base_name,
        }
        .trim();
        let (artist_raw, album_raw) = tag
            .split_once(" - ")
            .ok_or_else(|| IdentityError::MissingSeparator(base_name.to_string()))?;
        let artist = slugify(artist_raw.trim(), &[], true);
        let album = Self::album_or_artist(slugify(album_raw.trim(), &[], true), &artist);
        Ok(Identity { artist, album })
    }
}
