//! Vapor quality clamp policy.
//!
//! Quality is only defined inside the two-phase dome. A backend asked for quality at a
//! single-phase state returns a number outside [0, 1]. Such a state is treated as all vapor:
//! the consumed quality becomes exactly 1 and a caution is logged. Results calibrated against
//! reference fixtures depend on this substitution, so it is applied everywhere a provider
//! quality is consumed.

use tracing::warn;

/// A provider quality after the clamp policy was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedQuality {
    /// Value to use in mass bookkeeping, always in [0, 1].
    pub value: f64,
    /// Value reported by the provider.
    pub raw: f64,
    /// True if `raw` was outside [0, 1] and got replaced.
    pub clamped: bool,
}

/// Apply the clamp policy to a provider quality.
///
/// `context` names the consuming operation in the caution log line.
pub fn clamp_quality(raw: f64, context: &'static str) -> ClampedQuality {
    if (0.0..=1.0).contains(&raw) {
        ClampedQuality {
            value: raw,
            raw,
            clamped: false,
        }
    } else {
        warn!(raw, context, "quality constrained to 1 (single-phase state)");
        ClampedQuality {
            value: 1.0,
            raw,
            clamped: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_passes_through() {
        let q = clamp_quality(0.25, "test");
        assert_eq!(q.value, 0.25);
        assert!(!q.clamped);

        assert!(!clamp_quality(0.0, "test").clamped);
        assert!(!clamp_quality(1.0, "test").clamped);
    }

    #[test]
    fn negative_becomes_vapor() {
        let q = clamp_quality(-0.3, "test");
        assert_eq!(q.value, 1.0);
        assert_eq!(q.raw, -0.3);
        assert!(q.clamped);
    }

    #[test]
    fn above_one_becomes_vapor() {
        let q = clamp_quality(1.7, "test");
        assert_eq!(q.value, 1.0);
        assert!(q.clamped);
    }
}
