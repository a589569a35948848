//! Full-cycle composition.

use crate::config::{Scenario, validate_scenario};
use crate::error::CycleResult;
use crate::event::Event;
use crate::orchestrator::Orchestrator;
use crate::state::SimulationLog;
use lh2_core::units::{Time, s};
use lh2_fluids::PropertyProvider;
use tracing::info;

/// Events for one delivery round: offload at each station in order, travel back, refill.
///
/// Each offload heats the trailer to station pressure if needed, runs the rising-pressure
/// transfer, vents the station above its set point and tops it off at constant pressure.
pub fn standard_cycle_events<S: AsRef<str>>(
    stations: &[S],
    plant: &str,
    transport: Time,
) -> Vec<Event> {
    stations
        .iter()
        .map(|name| Event::offload_now(name.as_ref()))
        .chain([Event::travel(transport), Event::fill(plant, s(0.0))])
        .collect()
}

/// Validate `scenario` and run its events from its initial state.
pub fn run_scenario(
    provider: &dyn PropertyProvider,
    scenario: &Scenario,
) -> CycleResult<SimulationLog> {
    validate_scenario(scenario)?;
    let initial = scenario.initial_state()?;
    let events = scenario.events();
    let orchestrator = Orchestrator::new(provider, scenario.cycle_params());

    let log = orchestrator.run(initial, &events)?;
    info!(
        events = events.len(),
        delivered_kg = log.m_delivered_kg(),
        vented_kg = log.m_vented_kg(),
        "scenario complete"
    );
    Ok(log)
}
