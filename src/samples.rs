use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::{Error, Result};

static TEXTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/texts");

const DEFAULT_CATALOG: &str = "samples.json";

/// Ordered, non-empty list of texts to practise on
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SampleTexts {
    pub name: String,
    texts: Vec<String>,
}

impl SampleTexts {
    /// The catalog bundled with the binary
    pub fn builtin() -> Result<Self> {
        let file = TEXTS_DIR
            .get_file(DEFAULT_CATALOG)
            .ok_or_else(|| Error::SampleTexts(format!("{DEFAULT_CATALOG} is not bundled")))?;
        let json = file
            .contents_utf8()
            .ok_or_else(|| Error::SampleTexts(format!("{DEFAULT_CATALOG} is not utf-8")))?;
        Self::from_json(json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: SampleTexts =
            serde_json::from_str(json).map_err(|e| Error::SampleTexts(e.to_string()))?;
        Self::validate(catalog)
    }

    pub fn new(name: impl Into<String>, texts: Vec<String>) -> Result<Self> {
        Self::validate(SampleTexts {
            name: name.into(),
            texts,
        })
    }

    fn validate(catalog: SampleTexts) -> Result<Self> {
        if catalog.texts.is_empty() {
            return Err(Error::SampleTexts(format!(
                "catalog '{}' has no texts",
                catalog.name
            )));
        }
        if catalog.texts.iter().any(|t| t.is_empty()) {
            return Err(Error::SampleTexts(format!(
                "catalog '{}' contains an empty text",
                catalog.name
            )));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Text at `index`, wrapping around the end of the list
    pub fn get(&self, index: usize) -> &str {
        &self.texts[self.wrap(index)]
    }

    pub fn wrap(&self, index: usize) -> usize {
        index % self.texts.len()
    }

    /// Round-robin successor of `index`
    pub fn next_index(&self, index: usize) -> usize {
        (self.wrap(index) + 1) % self.texts.len()
    }
}
