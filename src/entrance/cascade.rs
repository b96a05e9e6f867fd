//! Per-sub-element entrance animations.
//!
//! A card's entrance is a cascade: image, tagline, heading, body text and
//! action button each rise and fade in with their own delay, so they land
//! one after another instead of all at once.

use web_time::Duration;

use super::RevealStrategy;
use crate::animation::{
    AnimationId, AnimationTiming, EasingFunction, FillMode, Keyframe,
};
use crate::dom::{Document, ElementId};

/// Timing for one step of a cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeStep {
    /// Delay from the moment the cascade starts.
    pub delay: Duration,
    /// Length of the rise/fade.
    pub duration: Duration,
    /// Starting vertical offset in pixels.
    pub rise: f64,
}

impl CascadeStep {
    /// Construct a step from millisecond values.
    #[must_use]
    pub const fn from_millis(delay_ms: u64, duration_ms: u64, rise: f64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            duration: Duration::from_millis(duration_ms),
            rise,
        }
    }
}

/// The sub-elements of a card that take part in its entrance. Any of them
/// may be missing from the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardParts {
    /// Primary image.
    pub image: Option<ElementId>,
    /// Small label above the heading.
    pub tagline: Option<ElementId>,
    /// Heading.
    pub heading: Option<ElementId>,
    /// Body text.
    pub text: Option<ElementId>,
    /// Call-to-action button.
    pub button: Option<ElementId>,
}

/// Step timings for every card part, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeTemplate {
    /// Curve shared by every step.
    pub easing: EasingFunction,
    /// Image step.
    pub image: CascadeStep,
    /// Tagline step.
    pub tagline: CascadeStep,
    /// Heading step.
    pub heading: CascadeStep,
    /// Body text step.
    pub text: CascadeStep,
    /// Button step.
    pub button: CascadeStep,
}

impl Default for CascadeTemplate {
    fn default() -> Self {
        Self {
            easing: EasingFunction::STANDARD,
            image: CascadeStep::from_millis(120, 640, 8.0),
            tagline: CascadeStep::from_millis(240, 380, 6.0),
            heading: CascadeStep::from_millis(320, 560, 10.0),
            text: CascadeStep::from_millis(420, 560, 8.0),
            button: CascadeStep::from_millis(520, 380, 6.0),
        }
    }
}

impl CascadeTemplate {
    /// Specs for a card, one per part, in cascade order. Missing parts
    /// yield specs without a target, which are skipped when run.
    #[must_use]
    pub fn build(&self, parts: &CardParts) -> Vec<SubAnimationSpec> {
        [
            (parts.image, self.image),
            (parts.tagline, self.tagline),
            (parts.heading, self.heading),
            (parts.text, self.text),
            (parts.button, self.button),
        ]
        .into_iter()
        .map(|(target, step)| SubAnimationSpec::rise(target, step, self.easing))
        .collect()
    }
}

/// One sub-element's entrance.
#[derive(Debug, Clone, PartialEq)]
pub struct SubAnimationSpec {
    /// The sub-element, if the markup has it.
    pub target: Option<ElementId>,
    /// Starting keyframe.
    pub from: Keyframe,
    /// Ending keyframe.
    pub to: Keyframe,
    /// Delay, duration, easing, fill.
    pub timing: AnimationTiming,
}

/// What running a [`SubAnimationSpec`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecOutcome {
    /// No target element; nothing happened.
    Skipped,
    /// Handed to the host animation primitive.
    Animated(AnimationId),
    /// End state written directly.
    EndState,
}

impl SubAnimationSpec {
    /// Fade in while rising `step.rise` pixels into place.
    #[must_use]
    pub fn rise(
        target: Option<ElementId>,
        step: CascadeStep,
        easing: EasingFunction,
    ) -> Self {
        Self {
            target,
            from: Keyframe::hidden_below(step.rise),
            to: Keyframe::settled(),
            timing: AnimationTiming::new(step.duration)
                .delayed(step.delay)
                .eased(easing)
                .filled(FillMode::Both),
        }
    }

    /// Run the sub-animation, writing the end state directly when the host
    /// cannot animate it.
    pub fn run<D: Document + ?Sized>(
        &self,
        document: &mut D,
        strategy: RevealStrategy,
    ) -> SpecOutcome {
        let Some(target) = self.target else {
            return SpecOutcome::Skipped;
        };
        if strategy == RevealStrategy::Animate {
            match document.animate(target, &[self.from, self.to], &self.timing)
            {
                Ok(id) => {
                    // Entrances are never cancelled.
                    document.release_animation(id);
                    return SpecOutcome::Animated(id);
                }
                Err(e) => log::trace!("animate {target} failed: {e}"),
            }
        }
        apply_keyframe(document, target, &self.to);
        SpecOutcome::EndState
    }
}

/// Write a keyframe straight to the element's inline style.
pub fn apply_keyframe<D: Document + ?Sized>(
    document: &mut D,
    element: ElementId,
    keyframe: &Keyframe,
) {
    if let Some(opacity) = keyframe.opacity {
        document.set_style(element, "opacity", &opacity.to_string());
    }
    document.set_style(element, "transform", &keyframe.transform.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Transform;
    use crate::dom::{Capabilities, MemoryDocument};

    #[test]
    fn test_build_keeps_declaration_order() {
        let parts = CardParts {
            tagline: Some(ElementId::from_raw(10)),
            heading: Some(ElementId::from_raw(11)),
            ..CardParts::default()
        };
        let specs = CascadeTemplate::default().build(&parts);
        assert_eq!(specs.len(), 5);
        assert_eq!(specs[0].target, None);
        assert_eq!(specs[1].target, Some(ElementId::from_raw(10)));

        let delays: Vec<_> = specs.iter().map(|s| s.timing.delay).collect();
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(specs[2].from.transform, Transform::TranslateY(10.0));
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut doc = MemoryDocument::new();
        let spec = SubAnimationSpec::rise(
            None,
            CascadeStep::from_millis(0, 100, 6.0),
            EasingFunction::STANDARD,
        );
        assert_eq!(
            spec.run(&mut doc, RevealStrategy::Animate),
            SpecOutcome::Skipped
        );
    }

    #[test]
    fn test_animate_failure_falls_back_to_end_state() {
        // Strategy says animate but the host refuses.
        let mut doc = MemoryDocument::with_capabilities(Capabilities::NONE);
        let heading = doc.append(doc.body(), "h2");
        let spec = SubAnimationSpec::rise(
            Some(heading),
            CascadeStep::from_millis(320, 560, 10.0),
            EasingFunction::STANDARD,
        );
        assert_eq!(
            spec.run(&mut doc, RevealStrategy::Animate),
            SpecOutcome::EndState
        );
        assert_eq!(doc.style(heading, "opacity"), Some("1"));
        assert_eq!(doc.style(heading, "transform"), Some("translateY(0px)"));
    }

    #[test]
    fn test_animate_passes_timing() {
        let mut doc = MemoryDocument::new();
        let text = doc.append(doc.body(), "p");
        let step = CascadeStep::from_millis(420, 560, 8.0);
        let spec =
            SubAnimationSpec::rise(Some(text), step, EasingFunction::STANDARD);
        assert!(matches!(
            spec.run(&mut doc, RevealStrategy::Animate),
            SpecOutcome::Animated(_)
        ));
        let record = doc.animations_on(text).next().unwrap();
        assert_eq!(record.timing.delay, Duration::from_millis(420));
        assert_eq!(record.timing.duration, Duration::from_millis(560));
        assert_eq!(record.keyframes[0], Keyframe::hidden_below(8.0));
        assert_eq!(doc.style(text, "opacity"), None);
        assert!(record.released);
        assert_eq!(doc.held_animations(), 0);
    }
}
