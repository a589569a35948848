//! Simulation snapshots and the append-only log.

use std::collections::BTreeMap;

use crate::event::Event;
use lh2_core::units::Temperature;
use lh2_process::{Diagnostic, Vessel};

/// Complete system state after an event.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Elapsed time since cycle start (s)
    pub time_s: f64,
    pub trailer: Vessel,
    /// Stations keyed by name
    pub stations: BTreeMap<String, Vessel>,
    /// Informational; carried through unchanged
    pub temperature: Temperature,
    /// Event that produced this snapshot, `None` for the initial state
    pub event: Option<Event>,
    /// Cumulative net mass gained by stations (kg)
    pub m_delivered_kg: f64,
    /// Cumulative mass released to atmosphere (kg)
    pub m_vented_kg: f64,
    /// Diagnostics raised while producing this snapshot
    pub diagnostics: Vec<Diagnostic>,
}

impl SimulationState {
    /// Initial state at time zero.
    pub fn initial(
        trailer: Vessel,
        stations: impl IntoIterator<Item = Vessel>,
        temperature: Temperature,
    ) -> Self {
        Self {
            time_s: 0.0,
            trailer,
            stations: stations
                .into_iter()
                .map(|v| (v.name.clone(), v))
                .collect(),
            temperature,
            event: None,
            m_delivered_kg: 0.0,
            m_vented_kg: 0.0,
            diagnostics: Vec::new(),
        }
    }

    pub fn station(&self, name: &str) -> Option<&Vessel> {
        self.stations.get(name)
    }

    /// Starting point for the snapshot produced by `event`: same vessels and totals,
    /// fresh diagnostics.
    pub(crate) fn successor(&self, event: &Event) -> Self {
        Self {
            event: Some(event.clone()),
            diagnostics: Vec::new(),
            ..self.clone()
        }
    }
}

/// Ordered snapshots: the initial state followed by one entry per event.
#[derive(Debug, Clone)]
pub struct SimulationLog {
    snapshots: Vec<SimulationState>,
}

impl SimulationLog {
    pub fn new(initial: SimulationState) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, snapshot: SimulationState) {
        self.snapshots.push(snapshot);
    }

    pub fn initial(&self) -> &SimulationState {
        &self.snapshots[0]
    }

    /// Most recent snapshot.
    pub fn last(&self) -> &SimulationState {
        // Never empty: constructed with the initial state
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[SimulationState] {
        &self.snapshots
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationState> {
        self.snapshots.iter()
    }

    /// Diagnostics from every snapshot, in order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.snapshots.iter().flat_map(|s| s.diagnostics.iter())
    }

    pub fn m_delivered_kg(&self) -> f64 {
        self.last().m_delivered_kg
    }

    pub fn m_vented_kg(&self) -> f64 {
        self.last().m_vented_kg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lh2_core::units::{k, s};

    fn initial() -> SimulationState {
        let trailer = Vessel::new("trailer", 32.0, 2100.0, 160_000.0).unwrap();
        let stations = [
            Vessel::new("north", 13.33, 150.0, 202_650.0).unwrap(),
            Vessel::new("south", 13.33, 300.0, 202_650.0).unwrap(),
        ];
        SimulationState::initial(trailer, stations, k(20.0))
    }

    #[test]
    fn stations_keyed_by_name() {
        let state = initial();
        assert_eq!(state.stations.len(), 2);
        assert_eq!(state.station("south").map(|v| v.m_kg), Some(300.0));
        assert!(state.station("east").is_none());
        assert!(state.event.is_none());
    }

    #[test]
    fn log_appends_in_order() {
        let mut log = SimulationLog::new(initial());
        let mut next = log.last().successor(&Event::delay(s(10.0)));
        next.time_s = 10.0;
        log.push(next);

        assert_eq!(log.len(), 2);
        assert_eq!(log.initial().time_s, 0.0);
        assert_eq!(log.last().time_s, 10.0);
        assert!(log.last().event.is_some());
        assert!(log.initial().event.is_none());
    }
}
