//! Click ripples.
//!
//! Each click spawns a circular child element centered on the pointer and
//! tinted against the button's background. The ripple removes itself when
//! its CSS animation ends, so nothing depends on the animation's length.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::dom::{Document, DomError, ElementId, EventKind, Point, Rect};

// ── Color ──

/// An sRGB color with channels in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Rgb {
    /// Construct a color, clamping channels to `[0, 255]`.
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 255.0),
            g: g.clamp(0.0, 255.0),
            b: b.clamp(0.0, 255.0),
        }
    }

    /// Perceived luminance in `[0, 1]`.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        0.114f64.mul_add(self.b, 0.299f64.mul_add(self.r, 0.587 * self.g))
            / 255.0
    }
}

/// Why a color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Not an `rgb(...)`/`rgba(...)` function.
    NotRgb,
    /// Fewer than three numeric channels.
    MissingChannel,
    /// A channel is not a number.
    BadChannel(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRgb => write!(f, "expected rgb() or rgba()"),
            Self::MissingChannel => write!(f, "expected three color channels"),
            Self::BadChannel(c) => write!(f, "invalid color channel '{c}'"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parse a computed `background-color`: `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)`, or the space-separated `rgb(r g b / a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let args = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ColorParseError::NotRgb)?;

        let mut channels = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| ColorParseError::BadChannel(part.to_owned()))
            });
        let mut next = || {
            channels
                .next()
                .unwrap_or(Err(ColorParseError::MissingChannel))
        };
        let (r, g, b) = (next()?, next()?, next()?);
        Ok(Self::new(r, g, b))
    }
}

/// Ripple tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RippleColor {
    /// For dark backgrounds.
    Light,
    /// For light backgrounds.
    Dark,
    /// Background unknown; a light tint.
    Fallback,
}

impl RippleColor {
    /// Backgrounds darker than this get a light ripple.
    pub const LUMINANCE_CUTOFF: f64 = 0.55;

    /// Pick a tint for a computed background color string.
    #[must_use]
    pub fn for_background(background: Option<&str>) -> Self {
        match background.map(str::parse::<Rgb>) {
            Some(Ok(rgb)) if rgb.luminance() < Self::LUMINANCE_CUTOFF => {
                Self::Light
            }
            Some(Ok(_)) => Self::Dark,
            _ => Self::Fallback,
        }
    }

    /// Whether this is a light tint.
    #[must_use]
    pub const fn is_light(self) -> bool {
        matches!(self, Self::Light | Self::Fallback)
    }

    /// CSS color value.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Light => "rgba(255,255,255,0.16)",
            Self::Dark => "rgba(0,0,0,0.12)",
            Self::Fallback => "rgba(255,255,255,0.14)",
        }
    }
}

// ── Geometry ──

/// Size and placement of a ripple relative to its button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    /// Diameter in pixels.
    pub size: f64,
    /// Left offset inside the button.
    pub left: f64,
    /// Top offset inside the button.
    pub top: f64,
}

impl RippleGeometry {
    /// Diameter relative to the button's larger dimension.
    pub const SCALE: f64 = 1.2;

    /// Ripple for a click at `point` on a button occupying `rect`.
    #[must_use]
    pub fn new(rect: Rect, point: Point) -> Self {
        let size = rect.max_extent() * Self::SCALE;
        Self {
            size,
            left: point.x - rect.x - size / 2.0,
            top: point.y - rect.y - size / 2.0,
        }
    }
}

// ── Layer ──

/// Live ripple elements, keyed by ripple.
#[derive(Debug, Clone, Default)]
pub struct RippleLayer {
    class: String,
    live: FxHashMap<ElementId, ElementId>,
}

impl RippleLayer {
    /// A layer whose ripples carry `class`.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            live: FxHashMap::default(),
        }
    }

    /// Make sure ripples are positioned relative to `button`.
    pub fn prepare_button<D: Document + ?Sized>(
        document: &mut D,
        button: ElementId,
    ) {
        if document.computed_style(button, "position").as_deref()
            == Some("static")
        {
            document.set_style(button, "position", "relative");
        }
    }

    /// Spawn a ripple in `button` for a click at `point`.
    pub fn spawn<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        button: ElementId,
        point: Point,
    ) -> Result<ElementId, DomError> {
        let geometry = RippleGeometry::new(document.bounding_rect(button), point);
        let color = RippleColor::for_background(
            document
                .computed_style(button, "background-color")
                .as_deref(),
        );

        let ripple = document.create_child(button, "span")?;
        document.add_class(ripple, &self.class);
        document.set_style(ripple, "background", color.css());
        let size = format!("{}px", geometry.size);
        document.set_style(ripple, "width", &size);
        document.set_style(ripple, "height", &size);
        document.set_style(ripple, "left", &format!("{}px", geometry.left));
        document.set_style(ripple, "top", &format!("{}px", geometry.top));
        document.listen(ripple, &[EventKind::AnimationEnd]);

        let _ = self.live.insert(ripple, button);
        Ok(ripple)
    }

    /// Remove a ripple whose animation finished. Returns `false` for
    /// elements that are not live ripples.
    pub fn finish<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        ripple: ElementId,
    ) -> bool {
        if self.live.remove(&ripple).is_none() {
            return false;
        }
        document.unlisten_all(ripple);
        document.remove(ripple);
        true
    }

    /// Whether `element` is a live ripple.
    #[must_use]
    pub fn is_live(&self, element: ElementId) -> bool {
        self.live.contains_key(&element)
    }

    /// Live ripples inside `button`.
    #[must_use]
    pub fn live_in(&self, button: ElementId) -> usize {
        self.live.values().filter(|&&owner| owner == button).count()
    }

    /// Number of live ripples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no ripple is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Remove every live ripple.
    pub fn clear<D: Document + ?Sized>(&mut self, document: &mut D) {
        for (ripple, _) in self.live.drain() {
            document.unlisten_all(ripple);
            document.remove(ripple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Capabilities, MemoryDocument};

    #[test]
    fn test_parse_rgb_forms() {
        let rgb: Rgb = "rgb(12, 34, 56)".parse().unwrap();
        assert_eq!(rgb, Rgb::new(12.0, 34.0, 56.0));
        let rgba: Rgb = "rgba(255, 255, 255, 0.5)".parse().unwrap();
        assert_eq!(rgba, Rgb::new(255.0, 255.0, 255.0));
        let modern: Rgb = "rgb(10 20 30 / 0.4)".parse().unwrap();
        assert_eq!(modern, Rgb::new(10.0, 20.0, 30.0));

        assert_eq!("red".parse::<Rgb>(), Err(ColorParseError::NotRgb));
        assert_eq!(
            "rgb(1, 2)".parse::<Rgb>(),
            Err(ColorParseError::MissingChannel)
        );
        assert!(matches!(
            "rgb(1, x, 3)".parse::<Rgb>(),
            Err(ColorParseError::BadChannel(_))
        ));
    }

    #[test]
    fn test_luminance_rule() {
        assert!(RippleColor::for_background(Some("rgb(0, 0, 0)")).is_light());
        assert_eq!(
            RippleColor::for_background(Some("rgb(255, 255, 255)")),
            RippleColor::Dark
        );
        assert!(RippleColor::for_background(Some("transparent")).is_light());
        assert!(RippleColor::for_background(None).is_light());
    }

    #[test]
    fn test_luminance_range() {
        assert_eq!(Rgb::new(0.0, 0.0, 0.0).luminance(), 0.0);
        assert!((Rgb::new(255.0, 255.0, 255.0).luminance() - 1.0).abs() < 1e-9);
        // Pure green sits above the cutoff, pure red below it.
        assert!(Rgb::new(0.0, 255.0, 0.0).luminance() > 0.55);
        assert!(Rgb::new(255.0, 0.0, 0.0).luminance() < 0.55);
    }

    #[test]
    fn test_geometry_centers_on_pointer() {
        let rect = Rect::new(100.0, 50.0, 200.0, 40.0);
        let geometry = RippleGeometry::new(rect, Point::new(150.0, 70.0));
        assert!((geometry.size - 240.0).abs() < 1e-9);
        assert!((geometry.left - (50.0 - 120.0)).abs() < 1e-9);
        assert!((geometry.top - (20.0 - 120.0)).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_and_finish() {
        let mut doc = MemoryDocument::new();
        let button = doc.append(doc.body(), "button");
        doc.set_rect(button, Rect::new(0.0, 0.0, 100.0, 40.0));
        doc.set_computed(button, "background-color", "rgb(20, 20, 20)");
        let mut layer = RippleLayer::new("ripple-effect");

        let ripple = layer
            .spawn(&mut doc, button, Point::new(10.0, 10.0))
            .unwrap();
        assert!(doc.has_class(ripple, "ripple-effect"));
        assert_eq!(doc.style(ripple, "width"), Some("120px"));
        assert_eq!(doc.style(ripple, "left"), Some("-50px"));
        assert_eq!(doc.style(ripple, "background"), Some("rgba(255,255,255,0.16)"));
        assert_eq!(doc.listeners(ripple), &[EventKind::AnimationEnd]);
        assert_eq!(layer.live_in(button), 1);

        assert!(layer.finish(&mut doc, ripple));
        assert!(!doc.is_attached(ripple));
        assert!(!layer.finish(&mut doc, ripple));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let mut doc = MemoryDocument::with_capabilities(Capabilities::NONE);
        let button = doc.append(doc.body(), "button");
        doc.set_element_creation_fails(true);
        let mut layer = RippleLayer::new("ripple-effect");
        assert!(layer.spawn(&mut doc, button, Point::default()).is_err());
        assert!(layer.is_empty());
    }

    #[test]
    fn test_prepare_button_only_touches_static() {
        let mut doc = MemoryDocument::new();
        let plain = doc.append(doc.body(), "button");
        let absolute = doc.append(doc.body(), "button");
        doc.set_computed(absolute, "position", "absolute");

        RippleLayer::prepare_button(&mut doc, plain);
        RippleLayer::prepare_button(&mut doc, absolute);
        assert_eq!(doc.style(plain, "position"), Some("relative"));
        assert_eq!(doc.style(absolute, "position"), None);
    }
}
