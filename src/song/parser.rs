//! Parser for the flat song text format and its inverse. A song body is a
//! sequence of parts separated by `---` lines; each part starts with its
//! title, followed by blank-line-separated paragraphs that become two-line
//! base slides. The final chunk is the arrangement: one line of
//! space-separated part titles defining performance order.

use crate::models::{Part, PartMap, Slide, Song};

/// Separator between parts (and before the arrangement line). The surrounding
/// newlines are part of the delimiter so a `---` inside a lyric line is left
/// alone.
const PART_DELIMITER: &str = "\n---\n";

/// Parse a raw song body into its structured form.
///
/// This never fails: text without any `---` separator parses into zero parts
/// with the whole body treated as the arrangement chunk, and callers are
/// expected to tolerate empty content. Stricter validation belongs in the
/// editing surface, not here.
pub fn parse(title: &str, raw_text: &str, path: &str) -> Song {
    let mut chunks: Vec<&str> = raw_text.split(PART_DELIMITER).collect();

    // split() always yields at least one chunk, so the arrangement line is
    // present even for empty input.
    let arrangement_line = chunks.pop().unwrap_or_default();

    let mut content = PartMap::default();
    for chunk in chunks {
        content.insert(parse_part(chunk));
    }

    let tokens: Vec<&str> = arrangement_line.split(' ').collect();
    let arrangement = resolve_arrangement(&tokens, &content);

    Song {
        title: title.to_string(),
        author: None,
        content,
        arrangement,
        path: path.split('/').map(str::to_string).collect(),
    }
}

/// Rebuild arrangement entries from the space-split tokens of the final
/// chunk. Part titles may themselves contain spaces ("Verse 1"), so adjacent
/// tokens are greedily recombined into the longest run that matches a parsed
/// part title; tokens that match nothing are kept verbatim so
/// [`Song::unresolved_titles`] can surface them.
fn resolve_arrangement(tokens: &[&str], content: &PartMap) -> Vec<String> {
    let mut arrangement = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        let mut matched = None;
        for end in (index + 1..=tokens.len()).rev() {
            let candidate = tokens[index..end].join(" ");
            if content.get(&candidate).is_some() {
                matched = Some((candidate, end));
                break;
            }
        }
        match matched {
            Some((title, end)) => {
                arrangement.push(title);
                index = end;
            }
            None => {
                arrangement.push(tokens[index].to_string());
                index += 1;
            }
        }
    }

    arrangement
}

/// Parse one `---`-delimited chunk: first line is the part title, the rest is
/// paragraph-per-slide lyric text. A chunk with no body yields a single slide
/// holding one empty line.
fn parse_part(chunk: &str) -> Part {
    let mut lines = chunk.split('\n');
    let title = lines.next().unwrap_or_default().trim().to_string();
    let body = lines.collect::<Vec<_>>().join("\n");

    let slides = body
        .split("\n\n")
        .map(|block| Slide {
            lines: block.split('\n').map(|line| line.trim().to_string()).collect(),
        })
        .collect();

    Part { title, slides }
}

/// Re-serialize a song's structured content back into the flat text format.
/// Editing works on the whole body at once, so saving a song goes through
/// this; `parse(serialize_body(song))` reproduces an equivalent song.
pub fn serialize_body(song: &Song) -> String {
    let mut sections: Vec<String> = song
        .content
        .iter()
        .map(|part| {
            let paragraphs: Vec<String> = part
                .slides
                .iter()
                .map(|slide| slide.lines.join("\n"))
                .collect();
            format!("{}\n{}", part.title, paragraphs.join("\n\n"))
        })
        .collect();

    sections.push(song.arrangement.join(" "));
    sections.join(PART_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "Verse 1\nLine A\nLine B\n\nLine C\nLine D\n---\nChorus\nLine E\nLine F\n---\nVerse 1 Chorus";

    #[test]
    fn parses_parts_slides_and_arrangement() {
        let song = parse("Sample", SAMPLE, "hymns/classic");

        assert_eq!(song.title, "Sample");
        assert_eq!(song.path, vec!["hymns", "classic"]);
        assert_eq!(song.arrangement, vec!["Verse 1", "Chorus"]);
        assert_eq!(song.content.len(), 2);

        let verse = song.content.get("Verse 1").unwrap();
        assert_eq!(verse.title, "Verse 1");
        assert_eq!(
            verse.slides,
            vec![Slide::new(["Line A", "Line B"]), Slide::new(["Line C", "Line D"])]
        );

        let chorus = song.content.get("Chorus").unwrap();
        assert_eq!(chorus.slides, vec![Slide::new(["Line E", "Line F"])]);
    }

    #[test]
    fn trims_lyric_lines_and_part_titles() {
        let song = parse("S", "  Verse 1  \n  padded line  \n---\nVerse 1", "");
        let verse = song.content.get("Verse 1").unwrap();
        assert_eq!(verse.slides, vec![Slide::new(["padded line"])]);
    }

    #[test]
    fn part_without_body_yields_one_empty_slide() {
        let song = parse("S", "Tag\n---\nTag", "");
        let tag = song.content.get("Tag").unwrap();
        assert_eq!(tag.slides, vec![Slide::new([""])]);
    }

    #[test]
    fn duplicate_part_titles_last_wins() {
        let song = parse("S", "Chorus\nold line\n---\nChorus\nnew line\n---\nChorus", "");
        assert_eq!(song.content.len(), 1);
        let chorus = song.content.get("Chorus").unwrap();
        assert_eq!(chorus.slides, vec![Slide::new(["new line"])]);
    }

    #[test]
    fn text_without_separators_degrades_to_arrangement_only() {
        let song = parse("S", "just some words", "");
        assert!(song.content.is_empty());
        assert_eq!(song.arrangement, vec!["just", "some", "words"]);
    }

    #[test]
    fn empty_path_produces_single_empty_segment() {
        let song = parse("S", "A\n---\nA", "");
        assert_eq!(song.path, vec![""]);
    }

    #[test]
    fn round_trip_reproduces_equivalent_song() {
        let song = parse("Sample", SAMPLE, "hymns");
        let reparsed = parse("Sample", &serialize_body(&song), "hymns");
        assert_eq!(song, reparsed);
        // And the serialized text itself is stable.
        assert_eq!(serialize_body(&song), SAMPLE);
    }

    #[test]
    fn unresolved_arrangement_titles_are_reported() {
        let song = parse("S", "Chorus\nline\n---\nChorus Bridge Bridge", "");
        assert_eq!(song.unresolved_titles(), vec!["Bridge"]);
    }

    #[test]
    fn multi_word_titles_recombine_around_unknown_tokens() {
        let song = parse(
            "S",
            "Verse 1\nline\n---\nPre Chorus\nline\n---\nVerse 1 Tag Pre Chorus",
            "",
        );
        assert_eq!(song.arrangement, vec!["Verse 1", "Tag", "Pre Chorus"]);
        assert_eq!(song.unresolved_titles(), vec!["Tag"]);
    }
}
