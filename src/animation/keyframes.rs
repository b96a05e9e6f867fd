//! Keyframe and timing descriptors handed to a host's animation primitive.

use std::fmt;

use web_time::Duration;

use super::easing::EasingFunction;

/// Host-issued handle to a running element animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Wrap a host-assigned raw handle.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The transform component of a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    /// `none`
    #[default]
    None,
    /// `translateX(<px>)`
    TranslateX(f64),
    /// `translateY(<px>)`
    TranslateY(f64),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::TranslateX(px) => write!(f, "translateX({px}px)"),
            Self::TranslateY(px) => write!(f, "translateY({px}px)"),
        }
    }
}

/// One keyframe: an optional opacity and a transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keyframe {
    /// Opacity in [0, 1]; `None` leaves opacity untouched.
    pub opacity: Option<f64>,
    /// Transform at this keyframe.
    pub transform: Transform,
}

impl Keyframe {
    /// Transparent and shifted `rise` pixels down: the start of an entrance.
    #[must_use]
    pub const fn hidden_below(rise: f64) -> Self {
        Self {
            opacity: Some(0.0),
            transform: Transform::TranslateY(rise),
        }
    }

    /// Opaque and in place: the end of an entrance.
    #[must_use]
    pub const fn settled() -> Self {
        Self {
            opacity: Some(1.0),
            transform: Transform::TranslateY(0.0),
        }
    }

    /// Horizontal offset only.
    #[must_use]
    pub const fn offset_x(px: f64) -> Self {
        Self {
            opacity: None,
            transform: Transform::TranslateX(px),
        }
    }
}

/// How an animation's effect applies outside its active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// No effect outside the active interval.
    None,
    /// Hold the last keyframe after the end.
    #[default]
    Forwards,
    /// Hold the first keyframe during the delay and the last after the end.
    Both,
}

impl FillMode {
    /// CSS / WAAPI keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Both => "both",
        }
    }
}

/// Timing parameters for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationTiming {
    /// Active duration.
    pub duration: Duration,
    /// Delay before the active interval starts.
    pub delay: Duration,
    /// Progress curve.
    pub easing: EasingFunction,
    /// Fill behavior.
    pub fill: FillMode,
}

impl AnimationTiming {
    /// Timing with the given duration, no delay, standard easing, and
    /// forwards fill.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// Set the start delay.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn eased(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Set the fill mode.
    #[must_use]
    pub fn filled(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Normalized progress at `elapsed` since the animation was started,
    /// accounting for the delay. Zero-length animations are complete
    /// immediately.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let active = elapsed.saturating_sub(self.delay);
        if self.duration.is_zero() {
            return 1.0;
        }
        (active.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_css() {
        assert_eq!(Transform::TranslateX(6.0).to_string(), "translateX(6px)");
        assert_eq!(Transform::TranslateY(0.0).to_string(), "translateY(0px)");
        assert_eq!(Transform::None.to_string(), "none");
    }

    #[test]
    fn test_progress_with_delay() {
        let timing = AnimationTiming::new(Duration::from_millis(100))
            .delayed(Duration::from_millis(50));
        assert_eq!(timing.progress(Duration::from_millis(20)), 0.0);
        assert!((timing.progress(Duration::from_millis(100)) - 0.5).abs() < 1e-9);
        assert_eq!(timing.progress(Duration::from_millis(500)), 1.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let timing = AnimationTiming::new(Duration::ZERO);
        assert_eq!(timing.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_builders() {
        let timing = AnimationTiming::new(Duration::from_millis(10))
            .eased(EasingFunction::Linear)
            .filled(FillMode::Both);
        assert_eq!(timing.easing, EasingFunction::Linear);
        assert_eq!(timing.fill.as_str(), "both");
        assert_eq!(timing.delay, Duration::ZERO);
    }
}
