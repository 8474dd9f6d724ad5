//! Sectioned prose with inline glosses.
//!
//! Input is a sequence of bracketed sections:
//!
//! ```text
//! [Chapter]
//! Title: Περὶ τοῦ λόγου
//! Gloss: On the word
//! [Vocab]
//! λόγος|word|logos.png
//! [Questions]
//! What is λόγος?|A word
//! [Content]
//! Subtitle: Opening
//! Λόγος(word) ἐστίν. Καλόν(good) ἐστίν.
//! ```
//!
//! Each `[Chapter]` opens `chapter-<n>` in order of appearance; the other
//! sections fill the most recent chapter.

use crate::config::{BookMetadata, ParseMode};
use crate::models::{
    Chapter, ContentItem, Diagnostic, DiagnosticKind, Paragraph, Question, VocabItem,
};
use crate::parse::classifier::{self, DirectiveKey, Line, LineKind, SectionLabel};
use crate::parse::registry::{ChapterOrder, ChapterRegistry};
use crate::parse::segmenter::{glossed_words, split_sentences};
use crate::parse::{BookParser, Diagnostics};

pub struct ProseParser;

impl Default for ProseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProseParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BookParser for ProseParser {
    fn mode(&self) -> ParseMode {
        ParseMode::Prose
    }

    fn parse_chapters(
        &self,
        source: &str,
        _metadata: &BookMetadata,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Chapter> {
        let mut assembler = SectionAssembler::new(diagnostics);
        for line in classifier::lines(source) {
            assembler.feed(&line);
        }
        assembler.finish()
    }
}

/// The section whose body is currently being read.
#[derive(Debug)]
enum Section {
    /// Before the first header.
    Preamble,
    Chapter,
    Vocab { records: usize },
    Questions { records: usize },
    Content { pending: Pending },
    /// Unknown label or a section with no chapter to fill.
    Ignored,
}

/// Subtitle/image waiting for the next content item.
#[derive(Debug, Default)]
struct Pending {
    subtitle: String,
    image: String,
}

struct SectionAssembler<'d> {
    registry: ChapterRegistry,
    section: Section,
    /// Next verse id in the current chapter.
    verse_counter: u64,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> SectionAssembler<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            registry: ChapterRegistry::new(ChapterOrder::Emission),
            section: Section::Preamble,
            verse_counter: 1,
            diagnostics,
        }
    }

    fn feed(&mut self, line: &Line<'_>) {
        match &line.kind {
            LineKind::SectionHeader(label) => self.open(label, line.number),
            LineKind::Directive { key, value } => self.directive(*key, value, line),
            _ => self.body(line),
        }
    }

    fn finish(mut self) -> Vec<Chapter> {
        self.close();
        self.registry.into_chapters()
    }

    fn open(&mut self, label: &SectionLabel, line_no: usize) {
        self.close();
        self.section = match label {
            SectionLabel::Chapter => {
                self.registry.open_next();
                self.verse_counter = 1;
                Section::Chapter
            }
            SectionLabel::Unknown(name) => {
                tracing::debug!(line = line_no, section = %name, "ignoring unknown section");
                Section::Ignored
            }
            known if self.registry.is_empty() => {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::OutOfContext,
                        format!("[{}] section found without a chapter", known.as_str()),
                    )
                    .at_line(line_no),
                );
                Section::Ignored
            }
            SectionLabel::Vocab => Section::Vocab { records: 0 },
            SectionLabel::Questions => Section::Questions { records: 0 },
            SectionLabel::Content => Section::Content {
                pending: Pending::default(),
            },
        };
    }

    /// Close the current section, reporting record sections that came out empty.
    fn close(&mut self) {
        let name = match std::mem::replace(&mut self.section, Section::Ignored) {
            Section::Vocab { records: 0 } => "Vocab",
            Section::Questions { records: 0 } => "Questions",
            _ => return,
        };
        // Chapter count, not necessarily the owning chapter's number.
        let chapter = self.registry.len();
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::EmptySection,
                format!("Empty [{name}] section in chapter {chapter}"),
            )
            .in_chapter(chapter),
        );
    }

    fn directive(&mut self, key: DirectiveKey, value: &str, line: &Line<'_>) {
        match (&mut self.section, key) {
            (Section::Chapter, DirectiveKey::Title) => {
                if let Some(c) = self.registry.current_mut() {
                    c.title.display = value.to_string();
                }
            }
            (Section::Chapter, DirectiveKey::Gloss) => {
                if let Some(c) = self.registry.current_mut() {
                    c.title.gloss = value.to_string();
                }
            }
            (Section::Chapter, DirectiveKey::TitleImage) => {
                if let Some(c) = self.registry.current_mut() {
                    c.title_image = value.to_string();
                }
            }
            (Section::Content { pending }, DirectiveKey::Subtitle) => {
                pending.subtitle = value.to_string();
            }
            (Section::Content { pending }, DirectiveKey::Image) => {
                pending.image = value.to_string();
            }
            _ if self.registry.is_empty() => {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::OutOfContext,
                        format!("directive {:?} found without a chapter", line.text),
                    )
                    .at_line(line.number),
                );
            }
            _ => self.body(line),
        }
    }

    fn body(&mut self, line: &Line<'_>) {
        match &mut self.section {
            Section::Vocab { records } => {
                if let Some(f) = classifier::split_record(line.text, 3) {
                    if let Some(c) = self.registry.current_mut() {
                        c.vocab.push(VocabItem {
                            word: f[0].to_string(),
                            gloss: f[1].to_string(),
                            image: f[2].to_string(),
                        });
                        *records += 1;
                    }
                } else {
                    let chapter = self.registry.len();
                    self.diagnostics.push(malformed("Vocab", 3, line, chapter));
                }
            }
            Section::Questions { records } => {
                if let Some(f) = classifier::split_record(line.text, 2) {
                    if let Some(c) = self.registry.current_mut() {
                        c.questions.push(Question {
                            question: f[0].to_string(),
                            answer: f[1].to_string(),
                        });
                        *records += 1;
                    }
                } else {
                    let chapter = self.registry.len();
                    self.diagnostics.push(malformed("Questions", 2, line, chapter));
                }
            }
            Section::Content { pending } => {
                let mut paragraphs = Vec::new();
                for sentence in split_sentences(line.text) {
                    let words = glossed_words(sentence);
                    if words.is_empty() {
                        continue;
                    }
                    paragraphs.push(Paragraph {
                        verse_id: self.verse_counter,
                        words,
                    });
                    self.verse_counter += 1;
                }
                if paragraphs.is_empty() {
                    return;
                }
                let pending = std::mem::take(pending);
                if let Some(c) = self.registry.current_mut() {
                    c.content.push(ContentItem {
                        subtitle: pending.subtitle,
                        image: pending.image,
                        paragraph: paragraphs,
                    });
                }
            }
            Section::Preamble | Section::Chapter | Section::Ignored => {
                tracing::debug!(line = line.number, "dropping line outside a record section");
            }
        }
    }
}

fn malformed(section: &str, arity: usize, line: &Line<'_>, chapter: usize) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::MalformedRecord,
        format!(
            "[{section}] line needs {arity} '|'-separated fields: {:?}",
            line.text
        ),
    )
    .at_line(line.number)
    .in_chapter(chapter)
}
