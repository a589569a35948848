//! Discrete cycle events.

use std::fmt;

use lh2_core::units::{Time, s};

/// What an event does to the simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Idle time; the trailer boils off in place.
    Delay,
    /// Transport time; the trailer boils off on the road.
    Travel,
    /// Transfer liquid from the trailer into the target station.
    Offload,
    /// Vent and refill the trailer at the target plant.
    Fill,
}

impl EventKind {
    /// Whether the event needs a target vessel.
    pub fn requires_target(self) -> bool {
        matches!(self, EventKind::Offload | EventKind::Fill)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Delay => "delay",
            EventKind::Travel => "travel",
            EventKind::Offload => "offload",
            EventKind::Fill => "fill",
        };
        f.write_str(name)
    }
}

/// One step of a delivery cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub duration: Time,
    /// Station (offload) or plant (fill) the event acts on
    pub target: Option<String>,
}

impl Event {
    pub fn delay(duration: Time) -> Self {
        Self {
            kind: EventKind::Delay,
            duration,
            target: None,
        }
    }

    pub fn travel(duration: Time) -> Self {
        Self {
            kind: EventKind::Travel,
            duration,
            target: None,
        }
    }

    pub fn offload(station: impl Into<String>, duration: Time) -> Self {
        Self {
            kind: EventKind::Offload,
            duration,
            target: Some(station.into()),
        }
    }

    pub fn fill(plant: impl Into<String>, duration: Time) -> Self {
        Self {
            kind: EventKind::Fill,
            duration,
            target: Some(plant.into()),
        }
    }

    /// Offload with no dwell time beyond the heating it triggers.
    pub fn offload_now(station: impl Into<String>) -> Self {
        Self::offload(station, s(0.0))
    }

    pub fn duration_s(&self) -> f64 {
        self.duration.value
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {} ({} s)", self.kind, target, self.duration_s()),
            None => write!(f, "{} ({} s)", self.kind, self.duration_s()),
        }
    }
}
