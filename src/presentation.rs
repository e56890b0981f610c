//! Derived presentation state for the live screen: the arrangement-ordered
//! list of re-chunked parts and the cursor that walks it. Everything here is
//! ephemeral and recomputed whenever the selected song or the slide size
//! changes; nothing is persisted.

use crate::models::{Slide, SlideSize, Song};
use crate::song::rechunk;

/// One arrangement entry, re-chunked and ready to render. A part title that
/// repeats in the arrangement yields independent instances, each re-chunked
/// fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationPart {
    /// The arrangement entry's title, kept even when it resolves to nothing
    /// so the live screen can show where the operator is.
    pub title: String,
    /// Presentation slides for this entry; empty when the title does not
    /// resolve to a part.
    pub slides: Vec<Slide>,
}

/// Position of the cursor within a [`SongPlan`]: which part, and which slide
/// inside it.
///
/// The fields are private so a reference can only be produced by
/// [`SlideRef::reset`] or by the plan's `advance`/`retreat`, which keep it in
/// bounds. A plan rebuild (size change) can still strand a previously valid
/// reference, so every accessor tolerates out-of-range values by returning
/// `None` instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideRef {
    part: usize,
    slide: usize,
}

impl SlideRef {
    /// The initial position: the leading sentinel blank of the first part.
    /// Selecting a song or changing the slide size resets to this.
    pub fn reset() -> Self {
        Self { part: 0, slide: 0 }
    }

    pub fn part(self) -> usize {
        self.part
    }

    pub fn slide(self) -> usize {
        self.slide
    }
}

/// The flattened presentation space for one song at one slide size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongPlan {
    parts: Vec<PresentationPart>,
}

impl SongPlan {
    /// Build the plan: one part per arrangement entry in order, re-chunked to
    /// the requested size, with a sentinel blank slide prepended to the first
    /// part and appended to the last so navigation starts from and ends on an
    /// empty frame regardless of part sizes.
    pub fn build(song: &Song, size: SlideSize) -> Self {
        let mut parts: Vec<PresentationPart> = song
            .arrangement
            .iter()
            .map(|title| PresentationPart {
                title: title.clone(),
                slides: song
                    .content
                    .get(title)
                    .map(|part| rechunk(&part.slides, size.lines()))
                    .unwrap_or_default(),
            })
            .collect();

        if let Some(first) = parts.first_mut() {
            first.slides.insert(0, Slide::blank());
        }
        if let Some(last) = parts.last_mut() {
            last.slides.push(Slide::blank());
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[PresentationPart] {
        &self.parts
    }

    /// The slide under the cursor, or `None` when either index is out of
    /// range.
    pub fn current(&self, at: SlideRef) -> Option<&Slide> {
        self.parts.get(at.part)?.slides.get(at.slide)
    }

    /// Look ahead to the slide `advance` would land on, without moving the
    /// cursor. Drives the operator's next-slide preview.
    pub fn peek_next(&self, at: SlideRef) -> Option<&Slide> {
        self.advance(at).and_then(|next| self.current(next))
    }

    /// The next position: the following slide within the current part, else
    /// the first slide of the next part, else `None` when already at the end
    /// (callers treat that as a no-op).
    pub fn advance(&self, at: SlideRef) -> Option<SlideRef> {
        let part = self.parts.get(at.part)?;
        if at.slide + 1 < part.slides.len() {
            return Some(SlideRef {
                part: at.part,
                slide: at.slide + 1,
            });
        }
        let next = self.parts.get(at.part + 1)?;
        if next.slides.is_empty() {
            None
        } else {
            Some(SlideRef {
                part: at.part + 1,
                slide: 0,
            })
        }
    }

    /// The previous position: the preceding slide within the current part,
    /// else the last slide of the previous part, else `None` when already at
    /// the very first slide.
    pub fn retreat(&self, at: SlideRef) -> Option<SlideRef> {
        if at.slide > 0 {
            return Some(SlideRef {
                part: at.part,
                slide: at.slide - 1,
            });
        }
        if at.part == 0 {
            return None;
        }
        let previous = self.parts.get(at.part - 1)?;
        let last = previous.slides.len().checked_sub(1)?;
        Some(SlideRef {
            part: at.part - 1,
            slide: last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::parse;

    const SAMPLE: &str =
        "Verse 1\nLine A\nLine B\n\nLine C\nLine D\n---\nChorus\nLine E\nLine F\n---\nVerse 1 Chorus Verse 1";

    fn plan(size: SlideSize) -> SongPlan {
        SongPlan::build(&parse("Sample", SAMPLE, ""), size)
    }

    #[test]
    fn one_part_per_arrangement_entry_with_repeats() {
        let plan = plan(SlideSize::Double);
        let titles: Vec<&str> = plan.parts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Verse 1", "Chorus", "Verse 1"]);
    }

    #[test]
    fn sentinel_blanks_bracket_the_song() {
        let plan = plan(SlideSize::Double);
        let first = plan.parts().first().unwrap();
        let last = plan.parts().last().unwrap();
        assert_eq!(first.slides[0], Slide::blank());
        assert_eq!(*last.slides.last().unwrap(), Slide::blank());
        // First part: sentinel + two base slides; repeated part gets its own
        // trailing sentinel.
        assert_eq!(first.slides.len(), 3);
        assert_eq!(last.slides.len(), 3);
    }

    #[test]
    fn missing_arrangement_titles_become_empty_parts() {
        let song = parse("S", "Chorus\nline one\nline two\n---\nBridge Chorus", "");
        let plan = SongPlan::build(&song, SlideSize::Double);
        assert_eq!(plan.parts()[0].title, "Bridge");
        // The leading sentinel still lands on the empty first part.
        assert_eq!(plan.parts()[0].slides, vec![Slide::blank()]);
        assert_eq!(plan.parts()[1].slides.len(), 2);
    }

    #[test]
    fn empty_arrangement_has_no_sentinels_to_place() {
        let song = Song {
            title: "S".into(),
            author: None,
            content: Default::default(),
            arrangement: Vec::new(),
            path: vec![String::new()],
        };
        let plan = SongPlan::build(&song, SlideSize::Double);
        assert!(plan.parts().is_empty());
        assert!(plan.current(SlideRef::reset()).is_none());
    }

    #[test]
    fn advance_walks_slides_then_parts() {
        let plan = plan(SlideSize::Double);
        let mut at = SlideRef::reset();
        assert_eq!(plan.current(at), Some(&Slide::blank()));

        at = plan.advance(at).unwrap();
        assert_eq!(plan.current(at), Some(&Slide::new(["Line A", "Line B"])));
        at = plan.advance(at).unwrap();
        at = plan.advance(at).unwrap();
        // Crossed into the chorus.
        assert_eq!(at.part(), 1);
        assert_eq!(plan.current(at), Some(&Slide::new(["Line E", "Line F"])));
    }

    #[test]
    fn advance_is_noop_at_the_end() {
        let plan = plan(SlideSize::Double);
        let mut at = SlideRef::reset();
        let mut steps = 0;
        while let Some(next) = plan.advance(at) {
            at = next;
            steps += 1;
            assert!(steps < 100, "cursor failed to terminate");
        }
        // Landed on the trailing sentinel of the last part.
        assert_eq!(plan.current(at), Some(&Slide::blank()));
        assert!(plan.advance(at).is_none());
        assert!(plan.peek_next(at).is_none());
    }

    #[test]
    fn retreat_is_noop_at_the_start() {
        let plan = plan(SlideSize::Double);
        assert!(plan.retreat(SlideRef::reset()).is_none());
    }

    #[test]
    fn retreat_reverses_advance() {
        let plan = plan(SlideSize::Double);
        let start = SlideRef::reset();
        let forward = plan.advance(start).and_then(|a| plan.advance(a)).unwrap();
        let back = plan.retreat(forward).and_then(|a| plan.retreat(a)).unwrap();
        assert_eq!(back, start);
    }

    #[test]
    fn peek_next_matches_advance_target() {
        let plan = plan(SlideSize::Single);
        let mut at = SlideRef::reset();
        while let Some(next) = plan.advance(at) {
            assert_eq!(plan.peek_next(at), plan.current(next));
            at = next;
        }
    }

    #[test]
    fn rebuilding_at_a_smaller_size_grows_the_slide_count() {
        let double = plan(SlideSize::Double);
        let single = plan(SlideSize::Single);
        let count = |p: &SongPlan| p.parts().iter().map(|part| part.slides.len()).sum::<usize>();
        assert!(count(&single) > count(&double));
    }
}
