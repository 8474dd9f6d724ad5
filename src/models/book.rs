use serde::{Deserialize, Serialize};

/// A converted book: metadata plus chapters in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub language: String,
    pub description: String,
    #[serde(
        rename = "coverImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    /// Always serialized, even when empty.
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Total number of paragraphs across all chapters.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|c| &c.content)
            .map(|item| item.paragraph.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub slug: String,
    pub title: Title,
    #[serde(rename = "titleImage")]
    pub title_image: String,
    pub vocab: Vec<VocabItem>,
    pub questions: Vec<Question>,
    pub content: Vec<ContentItem>,
}

impl Chapter {
    /// Empty chapter with the conventional `chapter-<n>` slug.
    #[must_use]
    pub fn numbered(n: u32) -> Self {
        Self {
            slug: format!("chapter-{n}"),
            title: Title::default(),
            title_image: String::new(),
            vocab: Vec::new(),
            questions: Vec::new(),
            content: Vec::new(),
        }
    }
}

/// Display title with an optional gloss (empty when absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub display: String,
    pub gloss: String,
}

impl Title {
    #[must_use]
    pub fn plain(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            gloss: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    pub word: String,
    pub gloss: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

/// One or more paragraphs sharing a subtitle/image context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    pub paragraph: Vec<Paragraph>,
}

impl ContentItem {
    /// Item holding a single paragraph and no subtitle or image.
    #[must_use]
    pub fn single(paragraph: Paragraph) -> Self {
        Self {
            subtitle: String::new(),
            image: String::new(),
            paragraph: vec![paragraph],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub verse_id: u64,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub gloss: String,
}

impl Word {
    /// Word without a gloss annotation.
    #[must_use]
    pub fn bare(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            gloss: String::new(),
        }
    }
}
