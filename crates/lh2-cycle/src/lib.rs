//! lh2-cycle: event-driven delivery cycles and parametric studies.
//!
//! Provides:
//! - `Event`: one discrete step (delay, travel, offload, fill)
//! - `SimulationState` snapshots and the append-only `SimulationLog`
//! - `Orchestrator`: threads vessel state through transitions event by event
//! - `run_scenario`: one configured cycle from a `Scenario`
//! - Parametric study driver running independent cases in parallel
//! - YAML scenario configuration with validation

pub mod config;
pub mod cycle;
pub mod error;
pub mod event;
pub mod orchestrator;
pub mod state;
pub mod study;

pub use config::{
    ConstantPressureModeDef, EventConfig, OffloadConfig, PlantConfig, Scenario, StationConfig,
    TrailerConfig, ValidationError, VesselConfig, load_scenario_yaml, scenario_from_str,
    validate_scenario,
};
pub use cycle::{run_scenario, standard_cycle_events};
pub use error::{CycleError, CycleResult};
pub use event::{Event, EventKind};
pub use orchestrator::{CycleParams, Orchestrator, Plant};
pub use state::{SimulationLog, SimulationState};
pub use study::{
    StudyCase, StudyOutcome, StudyParameters, StudySummary, reference_cases, run_study,
    run_study_case,
};
