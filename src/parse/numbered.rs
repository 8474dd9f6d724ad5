use std::collections::HashMap;

use crate::config::{BookMetadata, ParseMode};
use crate::models::{Chapter, ContentItem, Diagnostic, DiagnosticKind, Paragraph, Title, Word};
use crate::parse::classifier::{self, LineKind};
use crate::parse::registry::{ChapterOrder, ChapterRegistry};
use crate::parse::segmenter::plain_words;
use crate::parse::{BookParser, Diagnostics};

/// Chapter/paragraph keyed transcription.
///
/// `<c>.<v> text` lines land in chapter `c` (slug `chapter-<c>`) with verse id
/// `v`. `<c>.title text` names chapter `c` wherever it appears, and a
/// `0.0 text` part marker is prepended to the next newly created chapter as a
/// verse-0 paragraph. The two modes differ only in chapter order and in the
/// fallback title for chapters nobody named.
pub struct NumberedParser {
    mode: ParseMode,
    order: ChapterOrder,
}

impl NumberedParser {
    /// Chapters in ascending numeric order, untitled chapters left blank.
    #[must_use]
    pub fn keyed() -> Self {
        Self {
            mode: ParseMode::Keyed,
            order: ChapterOrder::NumericKey,
        }
    }

    /// Chapters in first-appearance order, untitled chapters called `Chapter <n>`.
    ///
    /// `0.0` stays a part marker here as in `keyed`; it never opens a chapter 0.
    #[must_use]
    pub fn grouped() -> Self {
        Self {
            mode: ParseMode::Grouped,
            order: ChapterOrder::Emission,
        }
    }

    fn fallback_title(&self, chapter: u32) -> Title {
        match self.mode {
            ParseMode::Grouped => Title::plain(format!("Chapter {chapter}")),
            _ => Title::default(),
        }
    }
}

impl BookParser for NumberedParser {
    fn mode(&self) -> ParseMode {
        self.mode
    }

    fn parse_chapters(
        &self,
        source: &str,
        _metadata: &BookMetadata,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Chapter> {
        let mut registry = ChapterRegistry::new(self.order);
        let mut titles: HashMap<u32, String> = HashMap::new();
        let mut pending_part: Option<String> = None;

        for line in classifier::lines(source) {
            match line.kind {
                LineKind::PartMarker { text } => {
                    pending_part = Some(text.to_string());
                }
                LineKind::TitleMarker {
                    chapter: Some(n),
                    text,
                } => {
                    titles.insert(n, text.to_string());
                }
                LineKind::TitleMarker { chapter: None, .. } => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::MalformedVerse,
                            format!("chapter number out of range in {:?}", line.text),
                        )
                        .at_line(line.number),
                    );
                }
                LineKind::Verse { reference, text } => {
                    let Some((chapter_no, verse_no)) = reference.numbers() else {
                        diagnostics.push(
                            Diagnostic::new(
                                DiagnosticKind::MalformedVerse,
                                format!("verse number out of range in {:?}", line.text),
                            )
                            .at_line(line.number),
                        );
                        continue;
                    };

                    let (chapter, created) = registry.get_or_open(chapter_no, |n| {
                        let mut c = Chapter::numbered(n);
                        c.title = self.fallback_title(n);
                        c
                    });
                    if created {
                        if let Some(part) = pending_part.take() {
                            chapter.content.push(ContentItem::single(Paragraph {
                                verse_id: 0,
                                words: vec![Word::bare(part)],
                            }));
                        }
                    }
                    chapter.content.push(ContentItem::single(Paragraph {
                        verse_id: u64::from(verse_no),
                        words: plain_words(text),
                    }));
                }
                _ => {
                    tracing::debug!(line = line.number, "skipping unrecognised line");
                }
            }
        }

        if let Some(part) = pending_part {
            tracing::debug!(part = %part, "part marker not followed by a new chapter");
        }

        for (key, chapter) in registry.iter_mut() {
            if let Some(title) = titles.remove(&key) {
                chapter.title.display = title;
            }
        }
        registry.into_chapters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(parser: &NumberedParser, source: &str) -> (Vec<Chapter>, Vec<Diagnostic>) {
        let meta = BookMetadata::new("Stoffel Epitome", "stoffel-epitome");
        let mut diagnostics = Diagnostics::new();
        let chapters = parser.parse_chapters(source, &meta, &mut diagnostics);
        (chapters, diagnostics.into_vec())
    }

    fn keyed(source: &str) -> Vec<Chapter> {
        parse_with(&NumberedParser::keyed(), source).0
    }

    #[test]
    fn part_marker_and_title_attach_to_first_chapter() {
        let chapters = keyed("0.0 Part One\n1.1 πρῶτος λόγος\n1.title Εἰσαγωγή\n");
        assert_eq!(chapters.len(), 1);
        let c = &chapters[0];
        assert_eq!(c.slug, "chapter-1");
        assert_eq!(c.title.display, "Εἰσαγωγή");
        assert_eq!(c.content.len(), 2);
        assert_eq!(c.content[0].paragraph[0].verse_id, 0);
        assert_eq!(c.content[0].paragraph[0].words, vec![Word::bare("Part One")]);
        assert_eq!(c.content[1].paragraph[0].verse_id, 1);
        assert_eq!(c.content[1].paragraph[0].words.len(), 2);
    }

    #[test]
    fn title_before_verse_also_applies() {
        let chapters = keyed("1.title Εἰσαγωγή\n0.0 Part One\n1.1 λόγος\n");
        assert_eq!(chapters[0].title.display, "Εἰσαγωγή");
        assert_eq!(chapters[0].content[0].paragraph[0].verse_id, 0);
    }

    #[test]
    fn part_marker_is_consumed_once() {
        let chapters = keyed("0.0 Part One\n1.1 α\n1.2 β\n2.1 γ\n");
        assert_eq!(chapters[0].content.len(), 3);
        assert_eq!(chapters[1].content.len(), 1);
        assert_eq!(chapters[1].content[0].paragraph[0].verse_id, 1);
    }

    #[test]
    fn part_marker_waits_for_new_chapter() {
        let chapters = keyed("1.1 α\n0.0 Part Two\n1.2 β\n2.1 γ\n");
        assert_eq!(chapters[0].content.len(), 2);
        assert_eq!(chapters[1].content[0].paragraph[0].verse_id, 0);
        assert_eq!(chapters[1].content[0].paragraph[0].words[0].word, "Part Two");
    }

    #[test]
    fn keyed_chapters_sort_numerically() {
        let chapters = keyed("10.1 κ\n2.1 β\n1.1 α\n2.2 ββ\n");
        let slugs: Vec<_> = chapters.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["chapter-1", "chapter-2", "chapter-10"]);
        assert_eq!(chapters[1].content.len(), 2);
    }

    #[test]
    fn keyed_untitled_chapter_is_blank() {
        let chapters = keyed("1.1 α\n");
        assert_eq!(chapters[0].title, Title::default());
    }

    #[test]
    fn titles_without_verses_make_no_chapter() {
        let chapters = keyed("5.title Lonely\n1.1 α\n");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].slug, "chapter-1");
    }

    #[test]
    fn last_title_wins() {
        let chapters = keyed("1.title First\n1.1 α\n1.title Second\n");
        assert_eq!(chapters[0].title.display, "Second");
    }

    #[test]
    fn verse_ids_are_source_numbers() {
        let chapters = keyed("1.12 α\n");
        assert_eq!(chapters[0].content[0].paragraph[0].verse_id, 12);
    }

    #[test]
    fn overflowing_numbers_are_reported() {
        let (chapters, diagnostics) =
            parse_with(&NumberedParser::keyed(), "99999999999.1 α\n1.1 β\n");
        assert_eq!(chapters.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedVerse);
        assert_eq!(diagnostics[0].line, Some(1));
    }

    #[test]
    fn grouped_keeps_first_appearance_order() {
        let (chapters, _) = parse_with(&NumberedParser::grouped(), "2.1 β\n1.1 α\n2.2 ββ\n");
        let slugs: Vec<_> = chapters.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["chapter-2", "chapter-1"]);
        assert_eq!(chapters[0].content.len(), 2);
    }

    #[test]
    fn grouped_defaults_title_to_chapter_number() {
        let (chapters, _) = parse_with(&NumberedParser::grouped(), "3.1 α\n4.title Named\n4.1 β\n");
        assert_eq!(chapters[0].title.display, "Chapter 3");
        assert_eq!(chapters[1].title.display, "Named");
    }

    #[test]
    fn grouped_part_marker_is_not_chapter_zero() {
        let (chapters, _) = parse_with(&NumberedParser::grouped(), "0.0 Part\n1.1 α\n");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].slug, "chapter-1");
        assert_eq!(chapters[0].title.display, "Chapter 1");
        assert_eq!(chapters[0].content[0].paragraph[0].verse_id, 0);
        assert_eq!(chapters[0].content[0].paragraph[0].words[0].word, "Part");
        assert!(chapters.iter().all(|c| c.slug != "chapter-0"));
    }

    #[test]
    fn empty_input_has_no_chapters() {
        assert!(keyed("").is_empty());
        assert!(keyed("0.0 Part only\n").is_empty());
    }
}
