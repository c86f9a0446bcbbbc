use std::collections::HashMap;
use std::fs;

use lumen_core::TranslationRequest;
use serde::Deserialize;

use crate::{LoadedResource, PipelineError};

/// A constructed translation model.
///
/// `on_update` receives the full output produced so far, not a delta.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        request: &TranslationRequest,
        on_update: &mut dyn FnMut(String),
    ) -> Result<String, PipelineError>;
}

/// Builds a [`Translator`] once its resources are on disk.
pub trait TranslatorFactory: Send + Sync {
    fn create(&self, resources: &[LoadedResource]) -> Result<Box<dyn Translator>, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct PhrasebookEntry {
    src_lang: String,
    tgt_lang: String,
    text: String,
    translation: String,
}

/// Exact-match translator backed by a JSON phrasebook.
///
/// Lookups ignore surrounding whitespace and ASCII case. Output is streamed
/// one word at a time the way a generating model reports partial text.
#[derive(Debug, Default, Clone)]
pub struct PhrasebookTranslator {
    entries: HashMap<(String, String, String), String>,
}

impl PhrasebookTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        src_lang: &str,
        tgt_lang: &str,
        text: &str,
        translation: &str,
    ) -> Self {
        self.insert(src_lang, tgt_lang, text, translation);
        self
    }

    pub fn insert(&mut self, src_lang: &str, tgt_lang: &str, text: &str, translation: &str) {
        self.entries
            .insert(key(src_lang, tgt_lang, text), translation.to_string());
    }

    /// Parses `[{"src_lang", "tgt_lang", "text", "translation"}, ...]`.
    pub fn from_json(file: &str, raw: &str) -> Result<Self, PipelineError> {
        let entries: Vec<PhrasebookEntry> =
            serde_json::from_str(raw).map_err(|err| PipelineError::InvalidModel {
                file: file.to_string(),
                message: err.to_string(),
            })?;
        let mut book = Self::new();
        for entry in entries {
            book.insert(&entry.src_lang, &entry.tgt_lang, &entry.text, &entry.translation);
        }
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for PhrasebookTranslator {
    fn translate(
        &self,
        request: &TranslationRequest,
        on_update: &mut dyn FnMut(String),
    ) -> Result<String, PipelineError> {
        let translation = self
            .entries
            .get(&key(&request.src_lang, &request.tgt_lang, &request.text))
            .ok_or_else(|| PipelineError::Untranslatable {
                text: request.text.clone(),
                src_lang: request.src_lang.clone(),
                tgt_lang: request.tgt_lang.clone(),
            })?;

        // Each update is a prefix of the stored text, ending at a word boundary.
        let mut in_word = false;
        for (index, c) in translation.char_indices() {
            if c.is_whitespace() {
                if in_word {
                    on_update(translation[..index].to_string());
                }
                in_word = false;
            } else {
                in_word = true;
            }
        }
        if in_word {
            on_update(translation.clone());
        }
        Ok(translation.trim_end().to_string())
    }
}

fn key(src_lang: &str, tgt_lang: &str, text: &str) -> (String, String, String) {
    (
        src_lang.to_string(),
        tgt_lang.to_string(),
        text.trim().to_ascii_lowercase(),
    )
}

/// Creates a [`PhrasebookTranslator`] from the resource named `file`.
#[derive(Debug, Clone)]
pub struct PhrasebookFactory {
    file: String,
}

impl PhrasebookFactory {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }
}

impl TranslatorFactory for PhrasebookFactory {
    fn create(&self, resources: &[LoadedResource]) -> Result<Box<dyn Translator>, PipelineError> {
        let resource = resources
            .iter()
            .find(|resource| resource.file == self.file)
            .ok_or_else(|| PipelineError::MissingResource(self.file.clone()))?;
        let raw = fs::read_to_string(&resource.path).map_err(|err| PipelineError::InvalidModel {
            file: self.file.clone(),
            message: err.to_string(),
        })?;
        Ok(Box::new(PhrasebookTranslator::from_json(&self.file, &raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> PhrasebookTranslator {
        PhrasebookTranslator::new().with_entry(
            "eng_Latn",
            "fra_Latn",
            "I love walking my dog.",
            "J'aime promener mon chien.",
        )
    }

    #[test]
    fn streams_cumulative_words() {
        let request = TranslationRequest::new("I love walking my dog.", "eng_Latn", "fra_Latn");
        let mut updates = Vec::new();
        let output = book()
            .translate(&request, &mut |partial| updates.push(partial))
            .unwrap();

        assert_eq!(output, "J'aime promener mon chien.");
        assert_eq!(
            updates,
            vec![
                "J'aime",
                "J'aime promener",
                "J'aime promener mon",
                "J'aime promener mon chien.",
            ]
        );
    }

    #[test]
    fn streaming_keeps_original_spacing() {
        let book = PhrasebookTranslator::new().with_entry(
            "eng_Latn",
            "fra_Latn",
            "Hello friend",
            "Bonjour,\nmon  ami.",
        );
        let request = TranslationRequest::new("Hello friend", "eng_Latn", "fra_Latn");
        let mut updates = Vec::new();
        let output = book
            .translate(&request, &mut |partial| updates.push(partial))
            .unwrap();

        assert_eq!(output, "Bonjour,\nmon  ami.");
        assert_eq!(
            updates,
            vec!["Bonjour,", "Bonjour,\nmon", "Bonjour,\nmon  ami."]
        );
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let request = TranslationRequest::new("  i LOVE walking my dog. ", "eng_Latn", "fra_Latn");
        assert!(book().translate(&request, &mut |_| {}).is_ok());
    }

    #[test]
    fn missing_pair_is_untranslatable() {
        let request = TranslationRequest::new("I love walking my dog.", "eng_Latn", "deu_Latn");
        let err = book().translate(&request, &mut |_| {}).unwrap_err();
        assert!(matches!(err, PipelineError::Untranslatable { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_model() {
        let err = PhrasebookTranslator::from_json("phrasebook.json", "{").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidModel { .. }));
    }

    #[test]
    fn factory_requires_its_resource() {
        let factory = PhrasebookFactory::new("phrasebook.json");
        assert!(matches!(
            factory.create(&[]),
            Err(PipelineError::MissingResource(file)) if file == "phrasebook.json"
        ));
    }
}
