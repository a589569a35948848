//! Recoverable conditions reported alongside transition results.

use std::fmt;

use lh2_fluids::{ClampedQuality, clamp_quality};
use tracing::warn;

/// Why the rising-pressure offload ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Next step would reach the lower of the two vessels' maximum pressures.
    PressureLimit,
    /// Next step would bring the station to its maximum mass.
    StationFull,
    /// Next step would leave the trailer below its vapor-empty mass.
    TrailerEmpty,
    /// Step budget exhausted without a physical stop.
    StepLimit,
    /// Input state violated a precondition; nothing was transferred.
    Precondition,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::PressureLimit => "pressure limit reached",
            StopReason::StationFull => "station full",
            StopReason::TrailerEmpty => "trailer empty",
            StopReason::StepLimit => "step limit reached",
            StopReason::Precondition => "precondition violated",
        };
        f.write_str(text)
    }
}

/// A condition an operation recovered from and reports to its caller.
///
/// Diagnostics never abort a run. The orchestrator and study driver decide whether a
/// given diagnostic matters for their purpose.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A vessel was outside a physical bound before the operation started.
    PreconditionViolation { reason: String },
    /// A provider quality outside [0, 1] was replaced by 1.
    QualityClamped { raw: f64, context: &'static str },
    /// The rising offload used its whole step budget.
    StepLimitReached { steps: usize },
    /// The rising offload stopped for the given reason.
    Stopped(StopReason),
}

impl Diagnostic {
    /// Build a precondition diagnostic and log it.
    pub fn precondition(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "precondition violated");
        Diagnostic::PreconditionViolation { reason }
    }

    /// Whether this diagnostic reports a precondition violation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Diagnostic::PreconditionViolation { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PreconditionViolation { reason } => {
                write!(f, "precondition violated: {}", reason)
            }
            Diagnostic::QualityClamped { raw, context } => {
                write!(f, "{}: quality {} constrained to 1", context, raw)
            }
            Diagnostic::StepLimitReached { steps } => {
                write!(f, "step limit reached after {} steps", steps)
            }
            Diagnostic::Stopped(reason) => write!(f, "offload stopped: {}", reason),
        }
    }
}

/// Apply the clamp policy to a provider quality and record a caution if it was replaced.
pub(crate) fn usable_quality(
    raw: f64,
    context: &'static str,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    let ClampedQuality {
        value,
        raw,
        clamped,
    } = clamp_quality(raw, context);
    if clamped {
        diagnostics.push(Diagnostic::QualityClamped { raw, context });
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_descriptive() {
        let d = Diagnostic::precondition("Trailer is empty");
        assert_eq!(d.to_string(), "precondition violated: Trailer is empty");
        assert!(d.is_precondition());

        let d = Diagnostic::Stopped(StopReason::StationFull);
        assert_eq!(d.to_string(), "offload stopped: station full");

        let d = Diagnostic::StepLimitReached { steps: 1000 };
        assert!(d.to_string().contains("1000"));
    }

    #[test]
    fn clamped_quality_is_recorded() {
        let mut diags = Vec::new();
        assert_eq!(usable_quality(0.4, "vent", &mut diags), 0.4);
        assert!(diags.is_empty());

        assert_eq!(usable_quality(-0.2, "vent", &mut diags), 1.0);
        assert_eq!(
            diags,
            vec![Diagnostic::QualityClamped {
                raw: -0.2,
                context: "vent"
            }]
        );
    }
}
