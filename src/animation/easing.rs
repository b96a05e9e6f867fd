//! Easing functions for animation interpolation.
//!
//! Curves are expressed the way CSS expresses them so the same value can be
//! handed to a browser's animation primitive ([`EasingFunction::to_css`]) or
//! sampled locally ([`EasingFunction::evaluate`]) to answer "where is this
//! animation right now".

use std::fmt;
use std::str::FromStr;

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)` with implicit endpoints (0,0) and
    /// (1,1).
    CubicBezier {
        /// First control point x, in [0, 1].
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in [0, 1].
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

/// Failure parsing a CSS easing string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EasingError {
    /// Not a keyword or `cubic-bezier(...)` call.
    Unknown(String),
    /// `cubic-bezier` with the wrong number of numeric arguments.
    BadArguments(String),
    /// An x control point outside [0, 1].
    OutOfRange(String),
}

impl fmt::Display for EasingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => write!(f, "unknown easing '{s}'"),
            Self::BadArguments(s) => {
                write!(f, "cubic-bezier needs four numbers, got '{s}'")
            }
            Self::OutOfRange(s) => {
                write!(f, "cubic-bezier x values must lie in [0, 1]: '{s}'")
            }
        }
    }
}

impl std::error::Error for EasingError {}

impl EasingFunction {
    /// Soft overshoot-free ease-out used by every entrance and chevron
    /// animation: `cubic-bezier(.22, .9, .24, 1)`.
    pub const STANDARD: Self = Self::CubicBezier {
        x1: 0.22,
        y1: 0.9,
        x2: 0.24,
        y2: 1.0,
    };

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::CubicBezier { x1, y1, x2, y2 } => {
                let s = solve_bezier_param(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }

    /// CSS `<easing-function>` text.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One axis of the cubic Bézier with endpoints 0 and 1:
/// `3(1-s)²s·p1 + 3(1-s)s²·p2 + s³`.
fn bezier_component(s: f64, p1: f64, p2: f64) -> f64 {
    let oms = 1.0 - s;
    3.0 * oms * oms * s * p1 + 3.0 * oms * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let oms = 1.0 - s;
    3.0 * oms * oms * p1 + 6.0 * oms * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`. Newton first, bisection when
/// the slope flattens out.
fn solve_bezier_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    s = x;
    while hi - lo > EPSILON {
        let value = bezier_component(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for EasingFunction {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bezier = |x1, y1, x2, y2| Self::CubicBezier { x1, y1, x2, y2 };
        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(bezier(0.25, 0.1, 0.25, 1.0)),
            "ease-in" => return Ok(bezier(0.42, 0.0, 1.0, 1.0)),
            "ease-out" => return Ok(bezier(0.0, 0.0, 0.58, 1.0)),
            "ease-in-out" => return Ok(bezier(0.42, 0.0, 0.58, 1.0)),
            _ => {}
        }

        let args = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| EasingError::Unknown(trimmed.to_owned()))?;
        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| EasingError::BadArguments(args.to_owned()))?;
        let &[x1, y1, x2, y2] = values.as_slice() else {
            return Err(EasingError::BadArguments(args.to_owned()));
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EasingError::OutOfRange(args.to_owned()));
        }
        Ok(bezier(x1, y1, x2, y2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_bezier_endpoints() {
        let standard = EasingFunction::STANDARD;
        assert!(standard.evaluate(0.0).abs() < 1e-6);
        assert!((standard.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_standard_is_ease_out() {
        // Fast start: a quarter of the way through time is well past a
        // quarter of the way through the value range.
        let at_quarter = EasingFunction::STANDARD.evaluate(0.25);
        assert!(
            at_quarter > 0.5,
            "ease-out should lead at t=0.25, got {at_quarter}"
        );
    }

    #[test]
    fn test_bezier_linear_diagonal() {
        // Control points on the diagonal reproduce linear timing.
        let diagonal: EasingFunction =
            "cubic-bezier(0.25, 0.25, 0.75, 0.75)".parse().unwrap();
        for t in [0.1, 0.3, 0.5, 0.9] {
            assert!((diagonal.evaluate(t) - t).abs() < 1e-4);
        }
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);
        assert!((EasingFunction::STANDARD.evaluate(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_short_decimals() {
        let parsed: EasingFunction =
            "cubic-bezier(.22,.9,.24,1)".parse().unwrap();
        assert_eq!(parsed, EasingFunction::STANDARD);
        assert_eq!(parsed.to_css(), "cubic-bezier(0.22, 0.9, 0.24, 1)");
    }

    #[test]
    fn test_parse_keywords_and_errors() {
        assert_eq!(
            "linear".parse::<EasingFunction>(),
            Ok(EasingFunction::Linear)
        );
        assert!("ease-out".parse::<EasingFunction>().is_ok());
        assert!(matches!(
            "bounce".parse::<EasingFunction>(),
            Err(EasingError::Unknown(_))
        ));
        assert!(matches!(
            "cubic-bezier(1, 2)".parse::<EasingFunction>(),
            Err(EasingError::BadArguments(_))
        ));
        assert!(matches!(
            "cubic-bezier(1.5, 0, 0.5, 1)".parse::<EasingFunction>(),
            Err(EasingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(EasingFunction::default(), EasingFunction::STANDARD);
    }
}
