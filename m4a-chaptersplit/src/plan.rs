use crate::discover::AUDIO_EXTENSION;
use crate::meta::Chapter;
use crate::slug::slugify;
use crate::time::seconds_to_display;

/// One planned output track for an item, in chapter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    /// 1-based track number, `chapter index + 1`. Never renumbered.
    pub track: u32,
    /// Slugified chapter title.
    pub title: String,
    pub start_display: String,
    pub end_display: String,
    /// `"{track}. {title}.m4a"`, relative to the target directory.
    pub file_name: String,
}

/// The item had no usable chapter sequence; it is skipped, the batch
/// continues.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("chapter marks not found in metadata")]
pub struct NoChapters;

/// Turn an item's chapter list into an ordered segment plan.
///
/// Chapters are taken in input order; start/end ranges are passed
/// through unvalidated (the transcoder is the arbiter of garbage
/// ranges). `None` means the metadata had no chapter sequence.
pub fn build_plan(chapters: Option<&[Chapter]>) -> Result<Vec<SegmentPlan>, NoChapters> {
    let chapters = chapters.ok_or(NoChapters)?;
    Ok(chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| {
            let track = i as u32 + 1;
            let title = slugify(&chapter.title, &[], true);
            SegmentPlan {
                track,
                file_name: format!("{}. {}.{}", track, title, AUDIO_EXTENSION),
                title,
                start_display: seconds_to_display(chapter.start_time),
                end_display: seconds_to_display(chapter.end_time),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(start: f64, end: f64, title: &str) -> Chapter {
        Chapter {
            start_time: start,
            end_time: end,
            title: title.to_string(),
        }
    }

    #[test]
    fn no_chapter_sequence_is_signalled() {
        assert_eq!(build_plan(None), Err(NoChapters));
    }

    #[test]
    fn an_empty_sequence_is_an_empty_plan() {
        assert_eq!(build_plan(Some(&[])), Ok(vec![]));
    }

    #[test]
    fn tracks_number_one_to_n_in_input_order() {
        let chapters: Vec<Chapter> = (0..5)
            .map(|i| chapter(i as f64 * 10.0, (i + 1) as f64 * 10.0, "x"))
            .collect();
        let plan = build_plan(Some(&chapters)).unwrap();
        let numbers: Vec<u32> = plan.iter().map(|s| s.track).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn unordered_chapters_keep_their_input_order() {
        let chapters = vec![chapter(100.0, 200.0, "later"), chapter(0.0, 100.0, "earlier")];
        let plan = build_plan(Some(&chapters)).unwrap();
        assert_eq!(plan[0].title, "later");
        assert_eq!(plan[0].track, 1);
        assert_eq!(plan[1].title, "earlier");
    }

    #[test]
    fn titles_are_slugified_and_named_into_files() {
        let chapters = vec![chapter(0.0, 65.0, "Intro"), chapter(65.0, 185.0, "Track: Two")];
        let plan = build_plan(Some(&chapters)).unwrap();
        assert_eq!(plan[0].file_name, "1. Intro.m4a");
        assert_eq!(plan[0].start_display, "0:00:00");
        assert_eq!(plan[0].end_display, "0:01:05");
        assert_eq!(plan[1].file_name, "2. Track_ Two.m4a");
        assert_eq!(plan[1].start_display, "0:01:05");
        assert_eq!(plan[1].end_display, "0:03:05");
    }

    #[test]
    fn garbage_ranges_pass_through() {
        let chapters = vec![chapter(50.0, 10.0, "backwards")];
        let plan = build_plan(Some(&chapters)).unwrap();
        assert_eq!(plan[0].start_display, "0:00:50");
        assert_eq!(plan[0].end_display, "0:00:10");
    }
}
