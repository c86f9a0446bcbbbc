/// Extensions the drop zone accepts, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// A file offered through drag-and-drop or the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime: String,
    /// Where the bytes can be read from later (path or object URL).
    pub source: String,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            source: source.into(),
        }
    }

    pub fn is_accepted_image(&self) -> bool {
        is_accepted_image(&self.name, &self.mime)
    }
}

/// `image/*` MIME type with one of [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_image(name: &str, mime: &str) -> bool {
    let is_image_mime = mime
        .split_once('/')
        .map(|(kind, subtype)| kind.trim().eq_ignore_ascii_case("image") && !subtype.trim().is_empty())
        .unwrap_or(false);
    if !is_image_mime {
        return false;
    }
    name.rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Guesses a MIME type from the file extension, for callers without one.
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Ordered image sources with a processed output slot per entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageIntake {
    sources: Vec<String>,
    processed: Vec<Option<String>>,
}

impl ImageIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends accepted files in order. Returns `(accepted, rejected)` counts.
    pub fn accept(&mut self, files: Vec<DroppedFile>) -> (usize, usize) {
        let mut accepted = 0;
        let mut rejected = 0;
        for file in files {
            if file.is_accepted_image() {
                self.sources.push(file.source);
                self.processed.push(None);
                accepted += 1;
            } else {
                rejected += 1;
            }
        }
        (accepted, rejected)
    }

    /// Removes the entry at `index` of the current sequence.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.sources.len() {
            return None;
        }
        self.processed.remove(index);
        Some(self.sources.remove(index))
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.processed.clear();
    }

    pub fn clear_processed(&mut self) {
        self.processed.iter_mut().for_each(|slot| *slot = None);
    }

    /// Stores the processed output for `index`. Returns false when out of range.
    pub fn set_processed(&mut self, index: usize, output: String) -> bool {
        match self.processed.get_mut(index) {
            Some(slot) => {
                *slot = Some(output);
                true
            }
            None => false,
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn processed(&self, index: usize) -> Option<&str> {
        self.processed.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert!(is_accepted_image("cat.PNG", "image/png"));
        assert!(is_accepted_image("cat.jpeg", "image/jpeg"));
        assert!(is_accepted_image("archive.tar.jpg", "image/jpeg"));
    }

    #[test]
    fn rejects_wrong_mime_or_extension() {
        assert!(!is_accepted_image("cat.gif", "image/gif"));
        assert!(!is_accepted_image("cat.png", "text/plain"));
        assert!(!is_accepted_image("cat", "image/png"));
        assert!(!is_accepted_image("cat.png", "image/"));
    }

    #[test]
    fn mime_guess_covers_accepted_extensions() {
        assert_eq!(mime_from_name("a.JPG"), "image/jpeg");
        assert_eq!(mime_from_name("a.png"), "image/png");
        assert_eq!(mime_from_name("noext"), "application/octet-stream");
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut intake = ImageIntake::new();
        intake.accept(vec![DroppedFile::new("a.png", "image/png", "a.png")]);
        assert_eq!(intake.remove(3), None);
        assert_eq!(intake.len(), 1);
    }
}
