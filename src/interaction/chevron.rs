//! Chevron nudge tied to a card button's hover and focus.

use web_time::{Duration, Instant};

use crate::animation::{
    AnimationId, AnimationTiming, EasingFunction, FillMode, Keyframe,
};
use crate::dom::{Document, ElementId};
use crate::entrance::{apply_keyframe, RevealStrategy};

/// Distance and timing of the slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChevronConfig {
    /// Horizontal offset when hovered, in pixels.
    pub distance: f64,
    /// Slide-out duration.
    pub enter: Duration,
    /// Slide-back duration.
    pub leave: Duration,
    /// Curve for both directions.
    pub easing: EasingFunction,
}

impl Default for ChevronConfig {
    fn default() -> Self {
        Self {
            distance: 6.0,
            enter: Duration::from_millis(200),
            leave: Duration::from_millis(220),
            easing: EasingFunction::STANDARD,
        }
    }
}

/// Which way the chevron last moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Toward the offset (hover, focus).
    Out,
    /// Back to rest (leave, blur).
    Back,
}

/// A running slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChevronAnimation {
    /// Host handle, used to cancel.
    pub id: AnimationId,
    /// Direction of travel.
    pub direction: SlideDirection,
    /// Start offset in pixels.
    pub from: f64,
    /// End offset in pixels.
    pub to: f64,
    /// When it started.
    pub started: Instant,
    /// Timing handed to the host.
    pub timing: AnimationTiming,
}

impl ChevronAnimation {
    /// Offset at `now`, following the easing curve.
    #[must_use]
    pub fn offset_at(&self, now: Instant) -> f64 {
        let t = self.timing.progress(now.saturating_duration_since(self.started));
        let eased = self.timing.easing.evaluate(t);
        (self.to - self.from).mul_add(eased, self.from)
    }
}

/// Slide state for one button+chevron pair. At most one animation is live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChevronSlide {
    chevron: ElementId,
    current: Option<ChevronAnimation>,
    direction: Option<SlideDirection>,
    resting: f64,
}

impl ChevronSlide {
    /// Slide state for `chevron`, at rest.
    #[must_use]
    pub const fn new(chevron: ElementId) -> Self {
        Self {
            chevron,
            current: None,
            direction: None,
            resting: 0.0,
        }
    }

    /// The chevron element.
    #[must_use]
    pub const fn chevron(&self) -> ElementId {
        self.chevron
    }

    /// The live animation, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&ChevronAnimation> {
        self.current.as_ref()
    }

    /// Direction of the last slide.
    #[must_use]
    pub const fn direction(&self) -> Option<SlideDirection> {
        self.direction
    }

    /// Slide out.
    pub fn enter<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        now: Instant,
        strategy: RevealStrategy,
        config: &ChevronConfig,
    ) {
        self.slide(document, SlideDirection::Out, now, strategy, config);
    }

    /// Slide back.
    pub fn leave<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        now: Instant,
        strategy: RevealStrategy,
        config: &ChevronConfig,
    ) {
        self.slide(document, SlideDirection::Back, now, strategy, config);
    }

    fn slide<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        direction: SlideDirection,
        now: Instant,
        strategy: RevealStrategy,
        config: &ChevronConfig,
    ) {
        self.cancel(document);
        let (from, to, duration) = match direction {
            SlideDirection::Out => (0.0, config.distance, config.enter),
            SlideDirection::Back => (config.distance, 0.0, config.leave),
        };
        self.direction = Some(direction);
        self.resting = to;

        let end = Keyframe::offset_x(to);
        if strategy == RevealStrategy::SetEndState {
            apply_keyframe(document, self.chevron, &end);
            return;
        }
        let timing = AnimationTiming::new(duration)
            .eased(config.easing)
            .filled(FillMode::Forwards);
        match document.animate(
            self.chevron,
            &[Keyframe::offset_x(from), end],
            &timing,
        ) {
            Ok(id) => {
                self.current = Some(ChevronAnimation {
                    id,
                    direction,
                    from,
                    to,
                    started: now,
                    timing,
                });
            }
            Err(e) => {
                log::trace!("chevron {} slide failed: {e}", self.chevron);
                apply_keyframe(document, self.chevron, &end);
            }
        }
    }

    /// Current horizontal offset in pixels.
    #[must_use]
    pub fn offset_at(&self, now: Instant) -> f64 {
        self.current
            .as_ref()
            .map_or(self.resting, |animation| animation.offset_at(now))
    }

    /// Cancel the live animation, if any.
    pub fn cancel<D: Document + ?Sized>(&mut self, document: &mut D) {
        if let Some(animation) = self.current.take() {
            document.cancel_animation(animation.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn setup() -> (MemoryDocument, ChevronSlide) {
        let mut doc = MemoryDocument::new();
        let chevron = doc.append_with_id(doc.body(), "span", "chevron_1");
        (doc, ChevronSlide::new(chevron))
    }

    #[test]
    fn test_alternating_never_overlaps() {
        let (mut doc, mut slide) = setup();
        let config = ChevronConfig::default();
        let t0 = Instant::now();

        for i in 0..9_u64 {
            let now = t0 + Duration::from_millis(i * 15);
            if i % 2 == 0 {
                slide.enter(&mut doc, now, RevealStrategy::Animate, &config);
            } else {
                slide.leave(&mut doc, now, RevealStrategy::Animate, &config);
            }
            assert_eq!(doc.running_animations(slide.chevron()), 1);
        }
        assert_eq!(slide.direction(), Some(SlideDirection::Out));
        assert_eq!(doc.animations_on(slide.chevron()).count(), 9);
    }

    #[test]
    fn test_offset_follows_curve() {
        let (mut doc, mut slide) = setup();
        let config = ChevronConfig::default();
        let t0 = Instant::now();

        slide.enter(&mut doc, t0, RevealStrategy::Animate, &config);
        assert_eq!(slide.offset_at(t0), 0.0);
        let mid = slide.offset_at(t0 + Duration::from_millis(100));
        assert!(mid > 3.0 && mid < 6.0, "ease-out is past halfway: {mid}");
        assert!((slide.offset_at(t0 + Duration::from_secs(1)) - 6.0).abs() < 1e-6);

        slide.leave(&mut doc, t0 + Duration::from_secs(1), RevealStrategy::Animate, &config);
        let back = slide.current().unwrap();
        assert_eq!(back.direction, SlideDirection::Back);
        assert_eq!(back.timing.duration, Duration::from_millis(220));
    }

    #[test]
    fn test_end_state_without_animation() {
        let (mut doc, mut slide) = setup();
        let config = ChevronConfig::default();
        let t0 = Instant::now();

        slide.enter(&mut doc, t0, RevealStrategy::SetEndState, &config);
        assert_eq!(doc.style(slide.chevron(), "transform"), Some("translateX(6px)"));
        assert_eq!(slide.offset_at(t0), 6.0);
        slide.leave(&mut doc, t0, RevealStrategy::SetEndState, &config);
        assert_eq!(doc.style(slide.chevron(), "transform"), Some("translateX(0px)"));
        assert!(slide.current().is_none());
    }

    #[test]
    fn test_cancel() {
        let (mut doc, mut slide) = setup();
        slide.enter(
            &mut doc,
            Instant::now(),
            RevealStrategy::Animate,
            &ChevronConfig::default(),
        );
        slide.cancel(&mut doc);
        assert_eq!(doc.running_animations(slide.chevron()), 0);
    }
}
