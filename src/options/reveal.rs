use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::entrance::Stagger;

/// When and how page sections and lazy elements are revealed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Reveal", inline)]
#[serde(default)]
pub struct RevealOptions {
    /// Delay before the first section is revealed.
    #[schemars(title = "Base Delay (ms)", range(min = 0, max = 2000))]
    pub base_delay_ms: u64,
    /// Added delay per following section.
    #[schemars(title = "Stagger (ms)", range(min = 0, max = 1000))]
    pub stagger_ms: u64,
    /// Visible fraction that reveals a section.
    #[schemars(title = "Section Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub section_threshold: f32,
    /// Visible fraction that reveals a card.
    #[schemars(title = "Card Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub card_threshold: f32,
    /// Class marking revealable elements.
    #[schemars(skip)]
    pub reveal_class: String,
    /// Class added on reveal.
    #[schemars(skip)]
    pub visible_class: String,
    /// Class marking fading images.
    #[schemars(skip)]
    pub image_class: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            base_delay_ms: 80,
            stagger_ms: 120,
            section_threshold: 0.08,
            card_threshold: 0.18,
            reveal_class: "reveal".to_owned(),
            visible_class: "visible".to_owned(),
            image_class: "img-fade".to_owned(),
        }
    }
}

impl RevealOptions {
    /// Stagger for the immediate group.
    #[must_use]
    pub const fn stagger(&self) -> Stagger {
        Stagger {
            base: Duration::from_millis(self.base_delay_ms),
            step: Duration::from_millis(self.stagger_ms),
        }
    }
}
