//! Animation descriptors, easing curves, and deferred-action scheduling.

pub mod easing;
pub mod keyframes;
pub mod scheduler;

pub use easing::{EasingError, EasingFunction};
pub use keyframes::{AnimationId, AnimationTiming, FillMode, Keyframe, Transform};
pub use scheduler::{DueTimer, TimerAction, TimerId, TimerQueue};
