//! Event-driven cycle orchestrator.
//!
//! Consumes an ordered list of [`Event`]s and threads one [`SimulationState`] through the
//! transition operations. Each event produces exactly one snapshot; the trailer carries
//! over between offloads while stations evolve independently, keyed by name.

use std::collections::BTreeMap;

use crate::error::{CycleError, CycleResult};
use crate::event::{Event, EventKind};
use crate::state::{SimulationLog, SimulationState};
use lh2_core::units::{Power, w};
use lh2_fluids::PropertyProvider;
use lh2_process::{
    ConstantPressureMode, Diagnostic, RisingOffloadOptions, StopReason, Vessel, boil_over_time,
    boil_to_pressure, fill_at_constant_pressure, offload_constant_pressure,
    offload_rising_pressure, vent_to_pressure,
};
use tracing::info;

/// A supply plant where the trailer is vented and refilled.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub name: String,
    /// Pressure the trailer is vented to and filled at (Pa)
    pub fill_pressure_pa: f64,
}

/// Fixed parameters of a cycle run.
#[derive(Debug, Clone)]
pub struct CycleParams {
    /// Steady heat leak into the trailer
    pub heat_load: Power,
    pub rising: RisingOffloadOptions,
    pub constant_mode: ConstantPressureMode,
    /// Trailer mass after a refill (kg)
    pub trailer_fill_mass_kg: f64,
    /// Station vent set points (Pa); stations without one are never vented
    pub vent_pressures_pa: BTreeMap<String, f64>,
    pub plants: Vec<Plant>,
}

impl Default for CycleParams {
    fn default() -> Self {
        Self {
            heat_load: w(40.7),
            rising: RisingOffloadOptions::default(),
            constant_mode: ConstantPressureMode::NoVent,
            trailer_fill_mass_kg: 2100.0,
            vent_pressures_pa: BTreeMap::new(),
            plants: Vec::new(),
        }
    }
}

/// Sequences transitions over a list of events.
pub struct Orchestrator<'a> {
    provider: &'a dyn PropertyProvider,
    params: CycleParams,
}

impl<'a> Orchestrator<'a> {
    pub fn new(provider: &'a dyn PropertyProvider, params: CycleParams) -> Self {
        Self { provider, params }
    }

    pub fn params(&self) -> &CycleParams {
        &self.params
    }

    /// Apply `events` in order starting from `initial`.
    ///
    /// The returned log holds the initial state plus one snapshot per event. A property
    /// lookup failure aborts the run.
    pub fn run(&self, initial: SimulationState, events: &[Event]) -> CycleResult<SimulationLog> {
        let mut log = SimulationLog::new(initial);
        for event in events {
            let next = self.apply(log.last(), event)?;
            log.push(next);
        }
        Ok(log)
    }

    /// Produce the snapshot that follows `state` under `event`.
    pub fn apply(&self, state: &SimulationState, event: &Event) -> CycleResult<SimulationState> {
        let duration_s = event.duration_s();
        if !duration_s.is_finite() || duration_s < 0.0 {
            return Err(CycleError::InvalidEvent {
                what: format!("{}: duration must be finite and non-negative", event),
            });
        }

        info!(event = %event, time_s = state.time_s, "applying event");
        let mut next = state.successor(event);

        match event.kind {
            EventKind::Delay | EventKind::Travel => self.boil_trailer(&mut next, duration_s)?,
            EventKind::Offload => self.offload(&mut next, target(event)?)?,
            EventKind::Fill => self.fill(&mut next, target(event)?)?,
        }

        next.time_s += duration_s;
        Ok(next)
    }

    fn boil_trailer(&self, next: &mut SimulationState, duration_s: f64) -> CycleResult<()> {
        if duration_s == 0.0 || next.trailer.m_kg <= 0.0 {
            return Ok(());
        }
        let boiled = boil_over_time(
            self.provider,
            &next.trailer,
            duration_s,
            self.params.heat_load.value,
        )?;
        next.trailer = boiled.vessel;
        next.diagnostics.extend(boiled.diagnostics);
        Ok(())
    }

    /// Match the trailer to the station pressure, rising offload, station vent, then guarded
    /// constant-pressure top-off.
    ///
    /// Every stage starts from the receiving station's own pressure. A colder trailer is
    /// heated up to it and a warmer one is vented down to it; that conditioning is kept
    /// even if the transfer itself is refused.
    fn offload(&self, next: &mut SimulationState, station_name: &str) -> CycleResult<()> {
        let station_initial = next
            .stations
            .get(station_name)
            .cloned()
            .ok_or_else(|| CycleError::UnknownVessel {
                name: station_name.to_string(),
            })?;

        if station_initial.p_pa > station_initial.max_pressure_pa {
            next.diagnostics.push(Diagnostic::precondition(format!(
                "{} at {:.0} Pa is above its design pressure {:.0} Pa",
                station_initial.name, station_initial.p_pa, station_initial.max_pressure_pa
            )));
            return Ok(());
        }

        next.trailer = self.match_pressure(next, station_initial.p_pa)?;

        let rising = offload_rising_pressure(
            self.provider,
            &next.trailer,
            &station_initial,
            &self.params.rising,
        )?;
        next.diagnostics.extend(rising.diagnostics.iter().cloned());
        if rising.stop_reason == StopReason::Precondition {
            return Ok(());
        }

        let mut p = rising.final_pressure_pa();
        let mut trailer = rising.trailer;
        let mut station = rising.station;
        let mut m_vented = 0.0;
        let mut diagnostics = Vec::new();

        if let Some(&p_vent) = self.params.vent_pressures_pa.get(station_name)
            && station.p_pa > p_vent
        {
            let vented = vent_to_pressure(self.provider, &station, p_vent)?;
            m_vented += vented.m_vented_kg;
            diagnostics.extend(vented.diagnostics);
            station = vented.vessel;
            p = p_vent;
        }

        let station_max = station.capacity_mass(self.provider, p)?;
        if station.m_kg < station_max {
            let topped = offload_constant_pressure(
                self.provider,
                &trailer,
                &station,
                p,
                self.params.constant_mode,
            )?;
            m_vented += topped.m_gas_vented_kg;
            diagnostics.extend(topped.diagnostics);
            trailer = topped.trailer;
            station = topped.station;
        } else {
            info!(
                station = station_name,
                "station at capacity; constant-pressure offload skipped"
            );
        }

        let station = station.with_pressure(p);
        if let Some(violation) = station.check_capacity(self.provider)? {
            next.diagnostics.push(violation);
            return Ok(());
        }

        let received = station.m_kg - station_initial.m_kg;
        info!(
            station = station_name,
            received,
            p_final = p,
            "offload complete"
        );

        next.m_delivered_kg += received;
        next.m_vented_kg += m_vented;
        next.diagnostics.extend(diagnostics);
        next.trailer = trailer.with_pressure(p);
        next.stations.insert(station_name.to_string(), station);
        Ok(())
    }

    /// Bring the trailer to `p_pa`: heat it when colder, vent it when warmer.
    ///
    /// Heating time and vented mass are booked on `next`.
    fn match_pressure(&self, next: &mut SimulationState, p_pa: f64) -> CycleResult<Vessel> {
        let trailer = &next.trailer;
        if trailer.p_pa < p_pa {
            let heated =
                boil_to_pressure(self.provider, trailer, p_pa, self.params.heat_load.value)?;
            next.time_s += heated.time_s;
            next.diagnostics.extend(heated.diagnostics);
            Ok(heated.vessel)
        } else if trailer.p_pa > p_pa {
            let vented = vent_to_pressure(self.provider, trailer, p_pa)?;
            info!(
                m_vented = vented.m_vented_kg,
                p_from = trailer.p_pa,
                p_to = p_pa,
                "trailer vented to station pressure"
            );
            next.m_vented_kg += vented.m_vented_kg;
            next.diagnostics.extend(vented.diagnostics);
            Ok(vented.vessel)
        } else {
            Ok(trailer.clone())
        }
    }

    /// Vent the trailer down to the plant fill pressure, then refill it.
    ///
    /// A fill target beyond the trailer's saturated-liquid capacity is refused with a
    /// precondition diagnostic; the vented trailer is kept.
    fn fill(&self, next: &mut SimulationState, plant_name: &str) -> CycleResult<()> {
        let plant = self
            .params
            .plants
            .iter()
            .find(|p| p.name == plant_name)
            .ok_or_else(|| CycleError::UnknownVessel {
                name: plant_name.to_string(),
            })?;

        if next.trailer.p_pa > plant.fill_pressure_pa {
            let vented = vent_to_pressure(self.provider, &next.trailer, plant.fill_pressure_pa)?;
            next.m_vented_kg += vented.m_vented_kg;
            next.diagnostics.extend(vented.diagnostics);
            next.trailer = vented.vessel;
        }

        let filled = fill_at_constant_pressure(
            self.provider,
            &next.trailer,
            self.params.trailer_fill_mass_kg,
            plant.fill_pressure_pa,
        )?;
        let refused = filled.diagnostics.iter().any(Diagnostic::is_precondition);
        next.diagnostics.extend(filled.diagnostics);
        if refused {
            return Ok(());
        }

        info!(
            plant = plant_name,
            added = filled.change_mass_kg,
            "trailer refilled"
        );
        next.trailer = filled.vessel;
        Ok(())
    }
}

fn target(event: &Event) -> CycleResult<&str> {
    event.target.as_deref().ok_or_else(|| CycleError::InvalidEvent {
        what: format!("{} event requires a target", event.kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lh2_core::units::{k, s};
    use lh2_fluids::DomeSurrogate;
    use lh2_process::Vessel;

    fn initial() -> SimulationState {
        let trailer = Vessel::new("trailer", 32.0, 1832.0, 202_650.0)
            .and_then(|v| v.with_pressure_limits(0.0, 1_204_514.0))
            .unwrap();
        let station = Vessel::new("station", 13.33, 146.0, 202_650.0)
            .and_then(|v| v.with_pressure_limits(0.0, 353_312.0))
            .and_then(|v| v.with_fill_fraction(0.95))
            .unwrap();
        SimulationState::initial(trailer, [station], k(20.0))
    }

    fn params() -> CycleParams {
        CycleParams {
            plants: vec![Plant {
                name: "plant".into(),
                fill_pressure_pa: 131_000.0,
            }],
            ..CycleParams::default()
        }
    }

    #[test]
    fn unknown_station_is_an_error() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let err = orch
            .apply(&initial(), &Event::offload_now("nowhere"))
            .unwrap_err();
        assert!(matches!(err, CycleError::UnknownVessel { name } if name == "nowhere"));
    }

    #[test]
    fn fill_must_target_a_plant() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let err = orch
            .apply(&initial(), &Event::fill("station", s(0.0)))
            .unwrap_err();
        assert!(matches!(err, CycleError::UnknownVessel { .. }));
    }

    #[test]
    fn targetless_offload_is_invalid() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let event = Event {
            kind: EventKind::Offload,
            duration: s(0.0),
            target: None,
        };
        assert!(matches!(
            orch.apply(&initial(), &event),
            Err(CycleError::InvalidEvent { .. })
        ));
    }

    #[test]
    fn negative_duration_is_invalid() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        assert!(matches!(
            orch.apply(&initial(), &Event::delay(s(-1.0))),
            Err(CycleError::InvalidEvent { .. })
        ));
    }

    #[test]
    fn delay_boils_trailer_only() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let start = initial();
        let next = orch.apply(&start, &Event::delay(s(3600.0))).unwrap();

        assert_eq!(next.time_s, 3600.0);
        assert_eq!(next.trailer.m_kg, start.trailer.m_kg);
        assert!(next.trailer.p_pa > start.trailer.p_pa);
        assert_eq!(next.stations, start.stations);
        assert_eq!(next.temperature, start.temperature);
    }

    #[test]
    fn offload_moves_mass_into_station() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let start = initial();
        let next = orch.apply(&start, &Event::offload_now("station")).unwrap();

        let station = next.station("station").unwrap();
        assert!((station.m_kg + next.trailer.m_kg - 1978.0).abs() < 1e-6);
        assert!((next.m_delivered_kg - (station.m_kg - 146.0)).abs() < 1e-9);
        assert_eq!(station.p_pa, next.trailer.p_pa);
        assert_eq!(next.m_vented_kg, 0.0);
        // Station was topped off to its usable capacity
        let cap = station.capacity_mass(&dome, station.p_pa).unwrap();
        assert!((station.m_kg - cap).abs() < 1e-6);
    }

    #[test]
    fn warm_trailer_is_vented_down_to_station_pressure() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let mut start = initial();
        start.trailer = start.trailer.with_mass(1500.0).with_pressure(450_000.0);

        let next = orch.apply(&start, &Event::offload_now("station")).unwrap();
        let station = next.station("station").unwrap();

        assert!(station.p_pa <= station.max_pressure_pa);
        assert_eq!(station.p_pa, next.trailer.p_pa);
        assert!(station.m_kg > 146.0);
        assert!(next.m_vented_kg > 0.0);
        let total = next.trailer.m_kg + station.m_kg + next.m_vented_kg;
        assert!((total - 1646.0).abs() < 1e-6);
        assert!(!next.diagnostics.iter().any(Diagnostic::is_precondition));
    }

    #[test]
    fn each_station_starts_from_its_own_pressure() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let south = Vessel::new("south", 13.33, 100.0, 250_000.0)
            .and_then(|v| v.with_pressure_limits(0.0, 353_312.0))
            .and_then(|v| v.with_fill_fraction(0.95))
            .unwrap();
        let mut start = initial();
        start.stations.insert("south".into(), south.clone());

        let after_first = orch.apply(&start, &Event::offload_now("station")).unwrap();
        assert!(after_first.trailer.p_pa > 250_000.0);
        let after_second = orch
            .apply(&after_first, &Event::offload_now("south"))
            .unwrap();

        // Same stages run by hand from the south station's pressure
        let vented = vent_to_pressure(&dome, &after_first.trailer, 250_000.0).unwrap();
        let rising =
            offload_rising_pressure(&dome, &vented.vessel, &south, &RisingOffloadOptions::default())
                .unwrap();
        let p = rising.final_pressure_pa();
        let expected = offload_constant_pressure(
            &dome,
            &rising.trailer,
            &rising.station,
            p,
            ConstantPressureMode::NoVent,
        )
        .unwrap();

        let station = after_second.station("south").unwrap();
        assert_eq!(station.p_pa, p);
        assert!(station.p_pa >= 250_000.0 && station.p_pa <= 353_312.0);
        assert!((station.m_kg - expected.station.m_kg).abs() < 1e-9);
        assert!((after_second.trailer.m_kg - expected.trailer.m_kg).abs() < 1e-9);
        let trailer_vent = after_second.m_vented_kg - after_first.m_vented_kg;
        assert!((trailer_vent - vented.m_vented_kg).abs() < 1e-9);
    }

    #[test]
    fn station_above_design_pressure_is_left_alone() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(&dome, params());
        let mut start = initial();
        let hot = start.stations["station"].with_pressure(360_000.0);
        start.stations.insert("station".into(), hot);

        let next = orch.apply(&start, &Event::offload_now("station")).unwrap();
        assert_eq!(next.stations, start.stations);
        assert_eq!(next.trailer, start.trailer);
        assert_eq!(next.m_delivered_kg, 0.0);
        assert!(matches!(
            next.diagnostics.as_slice(),
            [Diagnostic::PreconditionViolation { .. }]
        ));
    }

    #[test]
    fn overfull_refill_is_refused() {
        let dome = DomeSurrogate::default();
        let orch = Orchestrator::new(
            &dome,
            CycleParams {
                // 32 m³ of saturated liquid at 131 kPa holds 2262.08 kg
                trailer_fill_mass_kg: 2300.0,
                ..params()
            },
        );
        let start = initial();
        let next = orch.apply(&start, &Event::fill("plant", s(0.0))).unwrap();

        let vented = vent_to_pressure(&dome, &start.trailer, 131_000.0).unwrap();
        assert_eq!(next.trailer, vented.vessel);
        assert!((next.m_vented_kg - vented.m_vented_kg).abs() < 1e-12);
        assert!(next.diagnostics.iter().any(Diagnostic::is_precondition));
    }
}
