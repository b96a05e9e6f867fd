use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Press, ripple, card lift, and chevron settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
pub struct InteractionOptions {
    /// Class applied while a button is pressed.
    #[schemars(skip)]
    pub press_class: String,
    /// How long the pressed class stays after the last activation.
    #[schemars(title = "Press Pulse (ms)", range(min = 0, max = 1000))]
    pub press_ms: u64,
    /// Class given to ripple elements.
    #[schemars(skip)]
    pub ripple_class: String,
    /// Class for a lifted card.
    #[schemars(skip)]
    pub pop_class: String,
    /// Class for a card under a finger.
    #[schemars(skip)]
    pub touching_class: String,
    /// Release after a touch with no touch-end.
    #[schemars(title = "Touch Hold (ms)", range(min = 0, max = 5000))]
    pub touch_hold_ms: u64,
    /// Release delay after touch-end.
    #[schemars(title = "Touch Grace (ms)", range(min = 0, max = 1000))]
    pub touch_grace_ms: u64,
    /// Lift distance for a lifted card, in pixels.
    #[schemars(title = "Lift (px)", range(min = 0.0, max = 32.0), extend("step" = 1.0))]
    pub lift_px: f64,
    /// Lift distance while touching and on coarse pointers, in pixels.
    #[schemars(title = "Touch Lift (px)", range(min = 0.0, max = 32.0), extend("step" = 1.0))]
    pub touch_lift_px: f64,
    /// `box-shadow` of a lifted card.
    #[schemars(skip)]
    pub lift_shadow: String,
    /// Lift transition length.
    #[schemars(title = "Lift Transition (ms)", range(min = 0, max = 2000))]
    pub transition_ms: u64,
    /// Lift transition length while touching.
    #[schemars(title = "Touch Transition (ms)", range(min = 0, max = 2000))]
    pub touch_transition_ms: u64,
    /// Id of the injected card stylesheet.
    #[schemars(skip)]
    pub style_marker: String,
    /// CSS easing for the lift transition and the chevron slide.
    #[schemars(title = "Easing")]
    pub easing: String,
    /// Chevron offset while hovered, in pixels.
    #[schemars(title = "Chevron Offset (px)", range(min = 0.0, max = 32.0), extend("step" = 1.0))]
    pub chevron_distance_px: f64,
    /// Chevron slide-out duration.
    #[schemars(title = "Chevron Enter (ms)", range(min = 0, max = 2000))]
    pub chevron_enter_ms: u64,
    /// Chevron slide-back duration.
    #[schemars(title = "Chevron Leave (ms)", range(min = 0, max = 2000))]
    pub chevron_leave_ms: u64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            press_class: "click-press".to_owned(),
            press_ms: 120,
            ripple_class: "ripple-effect".to_owned(),
            pop_class: "pop".to_owned(),
            touching_class: "touching".to_owned(),
            touch_hold_ms: 700,
            touch_grace_ms: 80,
            lift_px: 8.0,
            touch_lift_px: 6.0,
            lift_shadow: "0 22px 46px rgba(0,0,0,0.22)".to_owned(),
            transition_ms: 260,
            touch_transition_ms: 160,
            style_marker: "card-pop-styles".to_owned(),
            easing: "cubic-bezier(.22,.9,.24,1)".to_owned(),
            chevron_distance_px: 6.0,
            chevron_enter_ms: 200,
            chevron_leave_ms: 220,
        }
    }
}
