pub mod book;
pub mod diagnostic;

pub use book::{Book, Chapter, ContentItem, Paragraph, Question, Title, VocabItem, Word};
pub use diagnostic::{Diagnostic, DiagnosticKind};
