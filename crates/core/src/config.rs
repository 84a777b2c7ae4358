//! Assistant configuration.

use crate::error::{Error, Result};
use crate::extract::SlideCountRange;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable behaviour of the chat assistant.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Slide count used when a request does not name one in range.
    pub default_slide_count: usize,

    /// Smallest slide count a request may ask for.
    pub min_slide_count: usize,

    /// Largest slide count a request may ask for.
    pub max_slide_count: usize,

    /// Titles longer than this are shortened in overview replies.
    pub overview_title_width: usize,

    /// Bullet range requested from the generator, e.g. "3-5".
    pub bullets_per_slide: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_slide_count: 5,
            min_slide_count: 2,
            max_slide_count: 15,
            overview_title_width: 40,
            bullets_per_slide: "3-5".to_string(),
        }
    }
}

impl AssistantConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that the slide count range is consistent.
    pub fn validate(&self) -> Result<()> {
        if self.min_slide_count == 0 {
            return Err(Error::ConfigError(
                "min_slide_count must be at least 1".to_string(),
            ));
        }
        if self.min_slide_count > self.max_slide_count {
            return Err(Error::ConfigError(format!(
                "min_slide_count ({}) is greater than max_slide_count ({})",
                self.min_slide_count, self.max_slide_count
            )));
        }
        if !(self.min_slide_count..=self.max_slide_count).contains(&self.default_slide_count) {
            return Err(Error::ConfigError(format!(
                "default_slide_count ({}) is outside {}..={}",
                self.default_slide_count, self.min_slide_count, self.max_slide_count
            )));
        }
        if self.overview_title_width == 0 {
            return Err(Error::ConfigError(
                "overview_title_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The slide count range used by the extractor.
    pub fn slide_count_range(&self) -> SlideCountRange {
        SlideCountRange {
            min: self.min_slide_count,
            max: self.max_slide_count,
            default: self.default_slide_count,
        }
    }
}
