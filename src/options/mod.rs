//! Engine configuration with TOML support.
//!
//! Every tunable (reveal timing, the card cascade, interaction feedback,
//! selectors) lives here. Options serialize to/from TOML so a page can
//! ship its own overrides, and export a JSON schema for editors.

mod cascade;
mod interaction;
mod reveal;
mod selectors;

use std::path::Path;

pub use cascade::{CascadeOptions, CascadeStepOptions};
pub use interaction::InteractionOptions;
pub use reveal::RevealOptions;
use schemars::JsonSchema;
pub use selectors::SelectorOptions;
use serde::{Deserialize, Serialize};

use crate::error::GlintError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[reveal]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Reveal timing and thresholds.
    pub reveal: RevealOptions,
    /// Card entrance cascade.
    pub cascade: CascadeOptions,
    /// Press, ripple, lift, and chevron feedback.
    pub interaction: InteractionOptions,
    /// Element selectors.
    #[schemars(skip)]
    pub selectors: SelectorOptions,
}

impl Options {
    /// Generate JSON Schema describing the editable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, GlintError> {
        toml::from_str(content)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GlintError> {
        let content = std::fs::read_to_string(path).map_err(GlintError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GlintError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlintError::Io)?;
        }
        std::fs::write(path, content).map_err(GlintError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r"
[reveal]
stagger_ms = 200
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.reveal.stagger_ms, 200);
        // Everything else should be default
        assert_eq!(opts.reveal.base_delay_ms, 80);
        assert_eq!(opts.interaction.press_ms, 120);
        assert_eq!(opts.selectors.sections, "#Home_Desktop > div");
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let err = Options::from_toml("[reveal]\nstagger_ms = \"soon\"")
            .unwrap_err();
        assert!(matches!(err, GlintError::OptionsParse(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join("glint-options-test");
        let path = dir.join("site.toml");
        let mut opts = Options::default();
        opts.reveal.card_threshold = 0.3;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_io() {
        let err = Options::load(Path::new("/nonexistent/glint.toml"))
            .unwrap_err();
        assert!(matches!(err, GlintError::Io(_)));
    }

    #[test]
    fn test_schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("reveal"));
        assert!(props.contains_key("cascade"));
        assert!(props.contains_key("interaction"));
        // Selectors are not tunable from an editor.
        assert!(!props.contains_key("selectors"));

        let reveal = &props["reveal"]["properties"];
        assert!(reveal.get("stagger_ms").is_some());
        assert!(reveal.get("card_threshold").is_some());
        assert!(reveal.get("visible_class").is_none());
    }
}
