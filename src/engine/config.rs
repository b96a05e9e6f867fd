//! Validated engine configuration.
//!
//! [`Options`] holds plain strings and numbers as they appear in TOML.
//! [`EngineConfig`] is the parsed form the engine runs on: selectors,
//! easing curves, and thresholds are checked once, up front.

use web_time::Duration;

use crate::animation::EasingFunction;
use crate::dom::Selector;
use crate::entrance::{CascadeTemplate, Stagger};
use crate::error::GlintError;
use crate::interaction::{
    ChevronConfig, InteractionConfig, PopConfig, PressConfig,
};
use crate::options::{CascadeOptions, InteractionOptions, Options, SelectorOptions};

/// Parsed selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    /// Query scope.
    pub root: Selector,
    /// Staggered top-level sections.
    pub sections: Selector,
    /// Other revealable elements.
    pub reveal: Selector,
    /// Buttons.
    pub buttons: Selector,
    /// Fading images.
    pub images: Selector,
    /// Cards.
    pub cards: Selector,
    /// Card image, inside a card.
    pub card_image: Selector,
    /// Card tagline, inside a card.
    pub tagline: Selector,
    /// Card heading, inside a card.
    pub heading: Selector,
    /// Card body text, inside a card.
    pub text: Selector,
    /// Card button, inside a card.
    pub card_button: Selector,
    /// Card chevron, inside a card.
    pub chevron: Selector,
}

impl SelectorSet {
    fn from_options(opts: &SelectorOptions) -> Result<Self, GlintError> {
        Ok(Self {
            root: parse_selector("root", &opts.root)?,
            sections: parse_selector("sections", &opts.sections)?,
            reveal: parse_selector("reveal", &opts.reveal)?,
            buttons: parse_selector("buttons", &opts.buttons)?,
            images: parse_selector("images", &opts.images)?,
            cards: parse_selector("cards", &opts.cards)?,
            card_image: parse_selector("card_image", &opts.card_image)?,
            tagline: parse_selector("tagline", &opts.tagline)?,
            heading: parse_selector("heading", &opts.heading)?,
            text: parse_selector("text", &opts.text)?,
            card_button: parse_selector("card_button", &opts.card_button)?,
            chevron: parse_selector("chevron", &opts.chevron)?,
        })
    }
}

fn parse_selector(
    option: &'static str,
    text: &str,
) -> Result<Selector, GlintError> {
    text.parse()
        .map_err(|source| GlintError::Selector { option, source })
}

fn check_threshold(threshold: f32) -> Result<f32, GlintError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(GlintError::Threshold(threshold))
    }
}

/// Everything the engine needs, parsed and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Element selectors.
    pub selectors: SelectorSet,
    /// Immediate-group reveal delays.
    pub stagger: Stagger,
    /// Visible fraction revealing a section or `.reveal` element.
    pub section_threshold: f32,
    /// Visible fraction revealing a card.
    pub card_threshold: f32,
    /// Class marking revealable elements.
    pub reveal_class: String,
    /// Class added on reveal.
    pub visible_class: String,
    /// Class marking fading images.
    pub image_class: String,
    /// Card entrance cascade.
    pub cascade: CascadeTemplate,
    /// Interaction feedback.
    pub interaction: InteractionConfig,
}

impl EngineConfig {
    /// Parse and validate options.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError`] for a selector or easing that does not parse,
    /// or a threshold outside `[0, 1]`.
    pub fn from_options(options: &Options) -> Result<Self, GlintError> {
        let reveal = &options.reveal;
        Ok(Self {
            selectors: SelectorSet::from_options(&options.selectors)?,
            stagger: reveal.stagger(),
            section_threshold: check_threshold(reveal.section_threshold)?,
            card_threshold: check_threshold(reveal.card_threshold)?,
            reveal_class: reveal.reveal_class.clone(),
            visible_class: reveal.visible_class.clone(),
            image_class: reveal.image_class.clone(),
            cascade: cascade_template(&options.cascade)?,
            interaction: interaction_config(&options.interaction)?,
        })
    }
}

fn cascade_template(opts: &CascadeOptions) -> Result<CascadeTemplate, GlintError> {
    Ok(CascadeTemplate {
        easing: opts.easing.parse::<EasingFunction>()?,
        image: opts.image.step(),
        tagline: opts.tagline.step(),
        heading: opts.heading.step(),
        text: opts.text.step(),
        button: opts.button.step(),
    })
}

fn interaction_config(
    opts: &InteractionOptions,
) -> Result<InteractionConfig, GlintError> {
    let easing = opts.easing.parse::<EasingFunction>()?;
    Ok(InteractionConfig {
        press: PressConfig {
            class: opts.press_class.clone(),
            duration: Duration::from_millis(opts.press_ms),
        },
        ripple_class: opts.ripple_class.clone(),
        pop: PopConfig {
            pop_class: opts.pop_class.clone(),
            touching_class: opts.touching_class.clone(),
            touch_hold: Duration::from_millis(opts.touch_hold_ms),
            touch_grace: Duration::from_millis(opts.touch_grace_ms),
            lift: opts.lift_px,
            touch_lift: opts.touch_lift_px,
            shadow: opts.lift_shadow.clone(),
            transition: Duration::from_millis(opts.transition_ms),
            touch_transition: Duration::from_millis(opts.touch_transition_ms),
            style_marker: opts.style_marker.clone(),
        },
        easing,
        chevron: ChevronConfig {
            distance: opts.chevron_distance_px,
            enter: Duration::from_millis(opts.chevron_enter_ms),
            leave: Duration::from_millis(opts.chevron_leave_ms),
            easing,
        },
    })
}
