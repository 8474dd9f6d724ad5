use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Default manifest filename looked up by `convert-all`.
pub const MANIFEST_FILE: &str = "book.toml";
/// Suffix for additional manifests sharing a directory (`ii_clement.book.toml`).
pub const MANIFEST_SUFFIX: &str = ".book.toml";

/// How verse numbers and sections in the source text are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// `<c>.<v> text` lines in one chapter, verse id = digit concatenation.
    Verse,
    /// `[Chapter]`/`[Vocab]`/`[Questions]`/`[Content]` sections with inline glosses.
    Prose,
    /// `<c>.<v> text` lines grouped by chapter number, ascending order.
    Keyed,
    /// `<c>.<v> text` lines grouped by chapter number, first-appearance order.
    Grouped,
}

impl ParseMode {
    pub const ALL: [ParseMode; 4] = [Self::Verse, Self::Prose, Self::Keyed, Self::Grouped];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verse => "verse",
            Self::Prose => "prose",
            Self::Keyed => "keyed",
            Self::Grouped => "grouped",
        }
    }

    /// One-line description for `versebook modes`.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Verse => "`<c>.<v> text` lines in a single chapter; verse id joins the digits",
            Self::Prose => "[Chapter]/[Vocab]/[Questions]/[Content] sections with word(gloss) notes",
            Self::Keyed => "`<c>.<v> text` lines grouped by chapter, ascending chapter order",
            Self::Grouped => "`<c>.<v> text` lines grouped by chapter, order of first appearance",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConvertError::UnknownMode { name: s.into() })
    }
}

/// Per-book constants copied verbatim into the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub restricted: Option<bool>,
    #[serde(default)]
    pub id: Option<String>,
}

impl BookMetadata {
    /// Metadata with only the required fields set.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }

    /// Reject slugs that are unsafe as file names.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ConvertError::Config("title must not be empty".into()));
        }
        if !is_valid_slug(&self.slug) {
            return Err(ConvertError::Config(format!(
                "invalid slug {:?}: use letters, digits, '-' and '_' only",
                self.slug
            )));
        }
        Ok(())
    }
}

/// Slugs double as file names and must stay filesystem-safe.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A book manifest as written in `book.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookManifest {
    #[serde(flatten)]
    pub metadata: BookMetadata,
    pub mode: ParseMode,
    /// Input text path, relative to the manifest (default `<slug>.txt`).
    #[serde(default)]
    pub input: Option<String>,
    /// Output JSON path, relative to the manifest (default `<slug>.json`).
    #[serde(default)]
    pub output: Option<String>,
    /// Fail the conversion when any diagnostic is produced.
    #[serde(default)]
    pub strict: bool,
}

impl BookManifest {
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| ConvertError::Manifest {
            path: origin.display().to_string(),
            detail: e.message().to_string(),
        })?;
        manifest.metadata.validate()?;
        Ok(manifest)
    }
}

/// A manifest together with its resolved input and output paths.
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Path of the manifest the config was loaded from.
    pub manifest_path: PathBuf,
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub manifest: BookManifest,
}

impl BookConfig {
    /// Load and resolve a manifest file.
    pub fn load(manifest_path: impl Into<PathBuf>) -> Result<Self> {
        let manifest_path = manifest_path.into();
        let content = std::fs::read_to_string(&manifest_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::InputNotFound {
                    path: manifest_path.display().to_string(),
                }
            } else {
                ConvertError::Io(e)
            }
        })?;
        let manifest = BookManifest::parse(&content, &manifest_path)?;
        let base_dir = manifest_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self::from_manifest(manifest_path, base_dir, manifest))
    }

    /// Resolve paths for an already parsed manifest.
    #[must_use]
    pub fn from_manifest(
        manifest_path: PathBuf,
        base_dir: PathBuf,
        manifest: BookManifest,
    ) -> Self {
        let slug = &manifest.metadata.slug;
        let input_path = base_dir.join(
            manifest
                .input
                .clone()
                .unwrap_or_else(|| format!("{slug}.txt")),
        );
        let output_path = base_dir.join(
            manifest
                .output
                .clone()
                .unwrap_or_else(|| format!("{slug}.json")),
        );
        Self {
            manifest_path,
            base_dir,
            input_path,
            output_path,
            manifest,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.manifest.metadata.slug
    }

    #[must_use]
    pub fn mode(&self) -> ParseMode {
        self.manifest.mode
    }
}

/// Check whether a file name marks a book manifest.
#[must_use]
pub fn is_manifest_name(name: &str) -> bool {
    name == MANIFEST_FILE || (name.ends_with(MANIFEST_SUFFIX) && name.len() > MANIFEST_SUFFIX.len())
}
