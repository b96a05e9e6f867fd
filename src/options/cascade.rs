use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entrance::CascadeStep;

/// Timing for one part of a card's entrance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(inline)]
pub struct CascadeStepOptions {
    /// Delay from the start of the cascade.
    #[schemars(range(min = 0, max = 3000))]
    pub delay_ms: u64,
    /// Rise/fade duration.
    #[schemars(range(min = 0, max = 3000))]
    pub duration_ms: u64,
    /// Starting offset below the resting position, in pixels.
    #[schemars(range(min = 0.0, max = 64.0), extend("step" = 1.0))]
    pub rise_px: f64,
}

impl CascadeStepOptions {
    const fn new(delay_ms: u64, duration_ms: u64, rise_px: f64) -> Self {
        Self {
            delay_ms,
            duration_ms,
            rise_px,
        }
    }

    /// The step these options describe.
    #[must_use]
    pub const fn step(&self) -> CascadeStep {
        CascadeStep::from_millis(self.delay_ms, self.duration_ms, self.rise_px)
    }
}

/// Card entrance cascade, one entry per card part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Card Cascade", inline)]
#[serde(default)]
pub struct CascadeOptions {
    /// CSS easing for every part.
    #[schemars(title = "Easing")]
    pub easing: String,
    /// Primary image.
    #[schemars(title = "Image")]
    pub image: CascadeStepOptions,
    /// Tagline.
    #[schemars(title = "Tagline")]
    pub tagline: CascadeStepOptions,
    /// Heading.
    #[schemars(title = "Heading")]
    pub heading: CascadeStepOptions,
    /// Body text.
    #[schemars(title = "Text")]
    pub text: CascadeStepOptions,
    /// Action button.
    #[schemars(title = "Button")]
    pub button: CascadeStepOptions,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            easing: "cubic-bezier(.22,.9,.24,1)".to_owned(),
            image: CascadeStepOptions::new(120, 640, 8.0),
            tagline: CascadeStepOptions::new(240, 380, 6.0),
            heading: CascadeStepOptions::new(320, 560, 10.0),
            text: CascadeStepOptions::new(420, 560, 8.0),
            button: CascadeStepOptions::new(520, 380, 6.0),
        }
    }
}
