use std::collections::HashMap;

use crate::models::Chapter;

/// Order in which registered chapters are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterOrder {
    /// Order of creation.
    Emission,
    /// Ascending chapter key, regardless of creation order.
    NumericKey,
}

/// Chapters under construction, addressable by key and by recency.
#[derive(Debug)]
pub struct ChapterRegistry {
    order: ChapterOrder,
    chapters: Vec<(u32, Chapter)>,
    index: HashMap<u32, usize>,
    current: Option<usize>,
}

impl ChapterRegistry {
    #[must_use]
    pub fn new(order: ChapterOrder) -> Self {
        Self {
            order,
            chapters: Vec::new(),
            index: HashMap::new(),
            current: None,
        }
    }

    /// Number of chapters created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Open the next sequentially numbered chapter (`chapter-<len + 1>`) and
    /// make it current.
    pub fn open_next(&mut self) -> &mut Chapter {
        let key = self.chapters.len() as u32 + 1;
        self.insert(key, Chapter::numbered(key))
    }

    /// Chapter for `key`, creating it with `make` when absent. The returned
    /// flag is true when the chapter was just created. Either way it becomes
    /// current.
    pub fn get_or_open(
        &mut self,
        key: u32,
        make: impl FnOnce(u32) -> Chapter,
    ) -> (&mut Chapter, bool) {
        if let Some(&idx) = self.index.get(&key) {
            self.current = Some(idx);
            return (&mut self.chapters[idx].1, false);
        }
        (self.insert(key, make(key)), true)
    }

    /// Most recently opened or addressed chapter.
    pub fn current_mut(&mut self) -> Option<&mut Chapter> {
        let idx = self.current?;
        self.chapters.get_mut(idx).map(|(_, c)| c)
    }

    /// Iterate chapters with their keys in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut Chapter)> {
        self.chapters.iter_mut().map(|(k, c)| (*k, c))
    }

    /// Finish the registry, yielding chapters in the configured order.
    #[must_use]
    pub fn into_chapters(self) -> Vec<Chapter> {
        let mut chapters = self.chapters;
        if self.order == ChapterOrder::NumericKey {
            chapters.sort_by_key(|(key, _)| *key);
        }
        chapters.into_iter().map(|(_, c)| c).collect()
    }

    fn insert(&mut self, key: u32, chapter: Chapter) -> &mut Chapter {
        let idx = self.chapters.len();
        self.chapters.push((key, chapter));
        self.index.insert(key, idx);
        self.current = Some(idx);
        &mut self.chapters[idx].1
    }
}
