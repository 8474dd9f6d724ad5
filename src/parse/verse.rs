use crate::config::{BookMetadata, ParseMode};
use crate::models::{Chapter, ContentItem, Paragraph, Title};
use crate::parse::classifier::{self, LineKind};
use crate::parse::segmenter::plain_words;
use crate::parse::{BookParser, Diagnostics};

/// Direct verse transcription: every `<c>.<v> text` line is one verse of a
/// single chapter titled after the book. Verse ids glue the chapter and verse
/// digits together.
pub struct VerseParser;

impl Default for VerseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BookParser for VerseParser {
    fn mode(&self) -> ParseMode {
        ParseMode::Verse
    }

    fn parse_chapters(
        &self,
        source: &str,
        metadata: &BookMetadata,
        _diagnostics: &mut Diagnostics,
    ) -> Vec<Chapter> {
        let mut chapter = Chapter::numbered(1);
        chapter.title = Title::plain(metadata.title.clone());

        for line in classifier::lines(source) {
            let (verse_id, text) = match line.kind {
                LineKind::Verse { reference, text } => (reference.concatenated_id(), text),
                // `0.0 text` is an ordinary verse here.
                LineKind::PartMarker { text } => (0, text),
                _ => {
                    tracing::debug!(line = line.number, "skipping non-verse line");
                    continue;
                }
            };
            chapter.content.push(ContentItem::single(Paragraph {
                verse_id,
                words: plain_words(text),
            }));
        }

        if chapter.content.is_empty() {
            return Vec::new();
        }
        vec![chapter]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Chapter> {
        let meta = BookMetadata::new("Trallians", "trallians");
        VerseParser::new().parse_chapters(source, &meta, &mut Diagnostics::new())
    }

    #[test]
    fn single_chapter_titled_after_book() {
        let chapters = parse("1.1 Ἰγνάτιος ὁ καὶ Θεοφόρος\n1.2 ἐπιγνοὺς\n");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].slug, "chapter-1");
        assert_eq!(chapters[0].title.display, "Trallians");
        assert_eq!(chapters[0].content.len(), 2);
        assert_eq!(chapters[0].content[0].paragraph[0].verse_id, 11);
        assert_eq!(chapters[0].content[0].paragraph[0].words.len(), 4);
    }

    #[test]
    fn verse_ids_concatenate_digits() {
        let chapters = parse("3.7 α\n12.3 β\n1.23 γ\n");
        let ids: Vec<u64> = chapters[0]
            .content
            .iter()
            .map(|c| c.paragraph[0].verse_id)
            .collect();
        assert_eq!(ids, vec![37, 123, 123]);
    }

    #[test]
    fn long_concatenated_ids_keep_their_value() {
        let chapters = parse("99999.99999 α\n");
        assert_eq!(chapters[0].content[0].paragraph[0].verse_id, 9_999_999_999);
    }

    #[test]
    fn chapter_numbers_do_not_split_chapters() {
        let chapters = parse("1.1 α\n2.1 β\n");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].content[1].paragraph[0].verse_id, 21);
    }

    #[test]
    fn each_verse_gets_its_own_item() {
        let chapters = parse("1.1 α β\n1.2 γ\n");
        for item in &chapters[0].content {
            assert_eq!(item.paragraph.len(), 1);
            assert!(item.subtitle.is_empty());
            assert!(item.image.is_empty());
        }
    }

    #[test]
    fn zero_zero_line_is_verse_zero() {
        let chapters = parse("0.0 Prologue text\n");
        let p = &chapters[0].content[0].paragraph[0];
        assert_eq!(p.verse_id, 0);
        assert_eq!(p.words.len(), 2);
    }

    #[test]
    fn other_lines_are_dropped() {
        let chapters = parse("Heading\n1.title x\n[Content]\n1.1 α\n");
        assert_eq!(chapters[0].content.len(), 1);
    }

    #[test]
    fn no_verses_no_chapter() {
        assert!(parse("").is_empty());
        assert!(parse("just prose\nmore prose\n").is_empty());
    }
}
