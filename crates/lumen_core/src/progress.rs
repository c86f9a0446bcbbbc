/// A resource load the UI shows a progress bar for.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressItem {
    pub file: String,
    pub progress: f64,
}

/// Active progress items keyed by file, in the order they were initiated.
///
/// Lookups are by key; position only matters for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressList {
    items: Vec<ProgressItem>,
}

impl ProgressList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `file` at 0%. A file that is already active is reset in place.
    pub fn initiate(&mut self, file: &str) {
        match self.position(file) {
            Some(index) => self.items[index].progress = 0.0,
            None => self.items.push(ProgressItem {
                file: file.to_string(),
                progress: 0.0,
            }),
        }
    }

    /// Stores `progress` verbatim. Returns false when `file` is not active.
    pub fn set_progress(&mut self, file: &str, progress: f64) -> bool {
        match self.position(file) {
            Some(index) => {
                self.items[index].progress = progress;
                true
            }
            None => false,
        }
    }

    /// Stops tracking `file`. Returns false when it was not active.
    pub fn finish(&mut self, file: &str) -> bool {
        match self.position(file) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, file: &str) -> Option<&ProgressItem> {
        self.items.iter().find(|item| item.file == file)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.position(file).is_some()
    }

    pub fn items(&self) -> &[ProgressItem] {
        &self.items
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.file.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, file: &str) -> Option<usize> {
        self.items.iter().position(|item| item.file == file)
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressList;

    #[test]
    fn reinitiate_resets_without_duplicating() {
        let mut list = ProgressList::new();
        list.initiate("a");
        list.initiate("b");
        assert!(list.set_progress("a", 70.0));
        list.initiate("a");

        let files: Vec<_> = list.files().collect();
        assert_eq!(files, vec!["a", "b"]);
        assert_eq!(list.get("a").unwrap().progress, 0.0);
    }

    #[test]
    fn unknown_files_are_reported() {
        let mut list = ProgressList::new();
        assert!(!list.set_progress("ghost", 10.0));
        assert!(!list.finish("ghost"));
        assert!(list.is_empty());
    }

    #[test]
    fn finish_keeps_relative_order_of_the_rest() {
        let mut list = ProgressList::new();
        for file in ["a", "b", "c"] {
            list.initiate(file);
        }
        assert!(list.finish("b"));
        let files: Vec<_> = list.files().collect();
        assert_eq!(files, vec!["a", "c"]);
        assert_eq!(list.len(), 2);
    }
}
