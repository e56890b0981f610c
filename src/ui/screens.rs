use crate::models::{SlideSize, Song, SongRecord};
use crate::presentation::{SlideRef, SongPlan};
use crate::song::{matches, parse};

/// Library screen state: the filtered view over the song list plus the
/// current selection. The master list lives on the `App`; this keeps a
/// filtered copy so every keystroke of a search only re-filters, never
/// re-queries.
pub(crate) struct LibraryScreen {
    pub(crate) filter: Option<String>,
    pub(crate) filtered: Vec<SongRecord>,
    pub(crate) selected: usize,
}

impl LibraryScreen {
    pub(crate) fn new(songs: &[SongRecord]) -> Self {
        let mut screen = Self {
            filter: None,
            filtered: Vec::new(),
            selected: 0,
        };
        screen.refresh(songs);
        screen
    }

    /// Re-apply the current filter against the master list. Matching goes
    /// through the normalized search key, so queries are accent- and
    /// punctuation-insensitive.
    pub(crate) fn refresh(&mut self, songs: &[SongRecord]) {
        self.filtered = match &self.filter {
            Some(query) if !query.trim().is_empty() => songs
                .iter()
                .filter(|record| matches(&record.search_key, query))
                .cloned()
                .collect(),
            _ => songs.to_vec(),
        };
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>, songs: &[SongRecord]) {
        self.filter = filter;
        self.refresh(songs);
    }

    pub(crate) fn current(&self) -> Option<&SongRecord> {
        self.filtered.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = (self.filtered.len() - 1) as isize;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
    }
}

/// Service screen state. The entries themselves live on the `App` (they
/// change underneath this screen whenever the database does), so only the
/// selection is held here.
#[derive(Default)]
pub(crate) struct ServiceScreen {
    pub(crate) selected: usize,
}

impl ServiceScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            return;
        }
        let last = (len - 1) as isize;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Live screen state: the parsed song, its presentation plan at the current
/// slide size, and the cursor. Plan and cursor are rebuilt whenever the song
/// or the size changes; they are pure derived state.
pub(crate) struct LiveScreen {
    /// Index of the service entry being presented, so Tab can step to the
    /// neighboring songs.
    pub(crate) item_index: usize,
    pub(crate) song: Song,
    pub(crate) plan: SongPlan,
    pub(crate) at: SlideRef,
}

impl LiveScreen {
    /// Parse the record and build the plan. Arrangement entries that do not
    /// resolve to a part are logged; presentation tolerates them as empty
    /// parts.
    pub(crate) fn open(item_index: usize, record: &SongRecord, size: SlideSize) -> Self {
        let mut song = parse(&record.name, &record.full_text, &record.path);
        if !record.author.trim().is_empty() {
            song.author = Some(record.author.clone());
        }

        let missing = song.unresolved_titles();
        if !missing.is_empty() {
            tracing::warn!(
                song = %song.title,
                titles = ?missing,
                "arrangement references parts that are not in the song"
            );
        }

        let plan = SongPlan::build(&song, size);
        Self {
            item_index,
            song,
            plan,
            at: SlideRef::reset(),
        }
    }

    /// Rebuild the plan at a new slide size and reset the cursor to the
    /// leading blank.
    pub(crate) fn set_size(&mut self, size: SlideSize) {
        self.plan = SongPlan::build(&self.song, size);
        self.at = SlideRef::reset();
    }

    /// Step forward; quiet no-op at the trailing blank.
    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.plan.advance(self.at) {
            self.at = next;
        }
    }

    /// Step backward; quiet no-op at the leading blank.
    pub(crate) fn retreat(&mut self) {
        if let Some(previous) = self.plan.retreat(self.at) {
            self.at = previous;
        }
    }

    /// Title of the part under the cursor, when the cursor is on one.
    pub(crate) fn part_title(&self) -> Option<&str> {
        self.plan
            .parts()
            .get(self.at.part())
            .map(|part| part.title.as_str())
    }

    /// "Part 2/3 - Slide 1/4" style position indicator for the header. A
    /// plan with no parts (empty arrangement) has no position to report.
    pub(crate) fn position_label(&self) -> String {
        let parts = self.plan.parts();
        if parts.is_empty() {
            return "No slides".to_string();
        }
        let slides_in_part = parts.get(self.at.part()).map(|p| p.slides.len()).unwrap_or(0);
        format!(
            "Part {}/{} - Slide {}/{}",
            self.at.part() + 1,
            parts.len(),
            self.at.slide() + 1,
            slides_in_part
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartMap;

    fn record(full_text: &str) -> SongRecord {
        SongRecord {
            id: 1,
            name: "Sample".to_string(),
            author: String::new(),
            path: String::new(),
            full_text: full_text.to_string(),
            search_key: String::new(),
        }
    }

    #[test]
    fn position_label_reports_part_and_slide() {
        let live = LiveScreen::open(
            0,
            &record("Verse\nLine A\nLine B\n---\nVerse"),
            SlideSize::Double,
        );
        // The cursor starts on the leading blank; both sentinels land in
        // the single part, so it holds three slides.
        assert_eq!(live.position_label(), "Part 1/1 - Slide 1/3");
    }

    #[test]
    fn position_label_tolerates_an_empty_plan() {
        let song = Song {
            title: "Empty".to_string(),
            author: None,
            content: PartMap::default(),
            arrangement: Vec::new(),
            path: vec![String::new()],
        };
        let live = LiveScreen {
            item_index: 0,
            plan: SongPlan::build(&song, SlideSize::Double),
            song,
            at: SlideRef::reset(),
        };
        assert_eq!(live.position_label(), "No slides");
    }
}
