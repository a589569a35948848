//! Scenario configuration: schema, YAML loading and validation.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CycleResult;
use crate::event::Event;
use crate::orchestrator::{CycleParams, Plant};
use crate::state::SimulationState;
use lh2_core::units::{k, s, w};
use lh2_process::{ConstantPressureMode, RisingOffloadOptions, Vessel};

/// A complete cycle definition: vessels, plants, transfer options and events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default = "default_heat_load_w")]
    pub heat_load_w: f64,
    pub trailer: TrailerConfig,
    #[serde(default)]
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub plants: Vec<PlantConfig>,
    #[serde(default)]
    pub offload: OffloadConfig,
    #[serde(default)]
    pub events: Vec<EventConfig>,
    #[serde(default = "default_temperature_k")]
    pub initial_temperature_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselConfig {
    pub name: String,
    pub volume_m3: f64,
    pub mass_kg: f64,
    pub pressure_pa: f64,
    pub max_pressure_pa: f64,
    #[serde(default)]
    pub min_pressure_pa: f64,
    #[serde(default = "default_fill_fraction")]
    pub max_fill_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mass_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailerConfig {
    #[serde(flatten)]
    pub vessel: VesselConfig,
    /// Mass after a refill at a plant (kg)
    pub fill_mass_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationConfig {
    #[serde(flatten)]
    pub vessel: VesselConfig,
    /// Station is vented to this pressure after a rising offload exceeds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vent_pressure_pa: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantConfig {
    pub name: String,
    pub fill_pressure_pa: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OffloadConfig {
    #[serde(default = "default_dp_pa")]
    pub dp_pa: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub constant_pressure_mode: ConstantPressureModeDef,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            dp_pa: default_dp_pa(),
            max_steps: default_max_steps(),
            constant_pressure_mode: ConstantPressureModeDef::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConstantPressureModeDef {
    #[default]
    NoVent,
    VentDisplacedGas,
}

impl From<ConstantPressureModeDef> for ConstantPressureMode {
    fn from(def: ConstantPressureModeDef) -> Self {
        match def {
            ConstantPressureModeDef::NoVent => ConstantPressureMode::NoVent,
            ConstantPressureModeDef::VentDisplacedGas => ConstantPressureMode::VentDisplacedGas,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventConfig {
    Delay {
        duration_s: f64,
    },
    Travel {
        duration_s: f64,
    },
    Offload {
        target: String,
        #[serde(default)]
        duration_s: f64,
    },
    Fill {
        target: String,
        #[serde(default)]
        duration_s: f64,
    },
}

impl EventConfig {
    pub fn to_event(&self) -> Event {
        match self {
            EventConfig::Delay { duration_s } => Event::delay(s(*duration_s)),
            EventConfig::Travel { duration_s } => Event::travel(s(*duration_s)),
            EventConfig::Offload { target, duration_s } => Event::offload(target, s(*duration_s)),
            EventConfig::Fill { target, duration_s } => Event::fill(target, s(*duration_s)),
        }
    }

    fn duration_s(&self) -> f64 {
        match self {
            EventConfig::Delay { duration_s }
            | EventConfig::Travel { duration_s }
            | EventConfig::Offload { duration_s, .. }
            | EventConfig::Fill { duration_s, .. } => *duration_s,
        }
    }
}

fn default_heat_load_w() -> f64 {
    40.7
}

fn default_temperature_k() -> f64 {
    20.0
}

fn default_fill_fraction() -> f64 {
    1.0
}

fn default_dp_pa() -> f64 {
    1000.0
}

fn default_max_steps() -> usize {
    1000
}

impl VesselConfig {
    pub fn to_vessel(&self) -> CycleResult<Vessel> {
        let mut vessel = Vessel::new(
            self.name.clone(),
            self.volume_m3,
            self.mass_kg,
            self.pressure_pa,
        )?
        .with_pressure_limits(self.min_pressure_pa, self.max_pressure_pa)?
        .with_fill_fraction(self.max_fill_fraction)?;
        if let Some(cap) = self.max_mass_kg {
            vessel = vessel.with_max_mass(cap)?;
        }
        Ok(vessel)
    }
}

impl Scenario {
    /// Reference trailer/station pair: one delivery, a day of transport, one refill.
    pub fn reference() -> Self {
        let fill_fraction = 0.95;
        Self {
            heat_load_w: default_heat_load_w(),
            trailer: TrailerConfig {
                vessel: VesselConfig {
                    name: "trailer".into(),
                    volume_m3: 32.0,
                    mass_kg: 2100.0,
                    pressure_pa: 160_000.0,
                    max_pressure_pa: 1_204_514.0,
                    min_pressure_pa: 0.0,
                    max_fill_fraction: 1.0,
                    max_mass_kg: None,
                },
                fill_mass_kg: 2100.0,
            },
            stations: vec![StationConfig {
                vessel: VesselConfig {
                    name: "station".into(),
                    volume_m3: 13.33,
                    mass_kg: 150.0,
                    pressure_pa: 202_650.0,
                    max_pressure_pa: 353_312.0,
                    min_pressure_pa: 0.0,
                    max_fill_fraction: fill_fraction,
                    max_mass_kg: Some(870.0 * fill_fraction),
                },
                vent_pressure_pa: None,
            }],
            plants: vec![PlantConfig {
                name: "plant".into(),
                fill_pressure_pa: 131_000.0,
            }],
            offload: OffloadConfig::default(),
            events: vec![
                EventConfig::Offload {
                    target: "station".into(),
                    duration_s: 0.0,
                },
                EventConfig::Travel {
                    duration_s: 86_400.0,
                },
                EventConfig::Fill {
                    target: "plant".into(),
                    duration_s: 0.0,
                },
            ],
            initial_temperature_k: default_temperature_k(),
        }
    }

    pub fn initial_state(&self) -> CycleResult<SimulationState> {
        let trailer = self.trailer.vessel.to_vessel()?;
        let stations = self
            .stations
            .iter()
            .map(|st| st.vessel.to_vessel())
            .collect::<CycleResult<Vec<_>>>()?;
        Ok(SimulationState::initial(
            trailer,
            stations,
            k(self.initial_temperature_k),
        ))
    }

    pub fn cycle_params(&self) -> CycleParams {
        CycleParams {
            heat_load: w(self.heat_load_w),
            rising: RisingOffloadOptions {
                dp_pa: self.offload.dp_pa,
                max_steps: self.offload.max_steps,
            },
            constant_mode: self.offload.constant_pressure_mode.into(),
            trailer_fill_mass_kg: self.trailer.fill_mass_kg,
            vent_pressures_pa: self
                .stations
                .iter()
                .filter_map(|st| st.vent_pressure_pa.map(|p| (st.vessel.name.clone(), p)))
                .collect::<BTreeMap<_, _>>(),
            plants: self
                .plants
                .iter()
                .map(|p| Plant {
                    name: p.name.clone(),
                    fill_pressure_pa: p.fill_pressure_pa,
                })
                .collect(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.iter().map(EventConfig::to_event).collect()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(field: String, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_positive(field: String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn validate_vessel(vessel: &VesselConfig) -> Result<(), ValidationError> {
    let name = &vessel.name;
    validate_positive(format!("{name}.volume_m3"), vessel.volume_m3)?;
    validate_positive(format!("{name}.pressure_pa"), vessel.pressure_pa)?;
    validate_positive(format!("{name}.max_pressure_pa"), vessel.max_pressure_pa)?;

    if !vessel.mass_kg.is_finite() || vessel.mass_kg < 0.0 {
        return Err(invalid(format!("{name}.mass_kg"), vessel.mass_kg, "must be non-negative"));
    }
    if !vessel.min_pressure_pa.is_finite() || vessel.min_pressure_pa < 0.0 {
        return Err(invalid(
            format!("{name}.min_pressure_pa"),
            vessel.min_pressure_pa,
            "must be non-negative",
        ));
    }
    if vessel.min_pressure_pa > vessel.max_pressure_pa {
        return Err(invalid(
            format!("{name}.min_pressure_pa"),
            vessel.min_pressure_pa,
            "must not exceed max_pressure_pa",
        ));
    }
    if !(vessel.max_fill_fraction > 0.0 && vessel.max_fill_fraction <= 1.0) {
        return Err(invalid(
            format!("{name}.max_fill_fraction"),
            vessel.max_fill_fraction,
            "must be in (0, 1]",
        ));
    }
    if let Some(cap) = vessel.max_mass_kg {
        validate_positive(format!("{name}.max_mass_kg"), cap)?;
    }
    Ok(())
}

/// Check a deserialized scenario for structural and physical consistency.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    validate_positive("heat_load_w".into(), scenario.heat_load_w)?;
    validate_positive("offload.dp_pa".into(), scenario.offload.dp_pa)?;

    validate_vessel(&scenario.trailer.vessel)?;
    validate_positive("trailer.fill_mass_kg".into(), scenario.trailer.fill_mass_kg)?;

    let mut station_names = HashSet::new();
    for station in &scenario.stations {
        if !station_names.insert(station.vessel.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: station.vessel.name.clone(),
                context: "stations".into(),
            });
        }
        validate_vessel(&station.vessel)?;
        if let Some(p_vent) = station.vent_pressure_pa {
            validate_positive(format!("{}.vent_pressure_pa", station.vessel.name), p_vent)?;
        }
    }

    let mut plant_names = HashSet::new();
    for plant in &scenario.plants {
        if !plant_names.insert(plant.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: plant.name.clone(),
                context: "plants".into(),
            });
        }
        validate_positive(format!("{}.fill_pressure_pa", plant.name), plant.fill_pressure_pa)?;
    }

    for (index, event) in scenario.events.iter().enumerate() {
        let duration_s = event.duration_s();
        if !duration_s.is_finite() || duration_s < 0.0 {
            return Err(invalid(
                format!("events[{index}].duration_s"),
                duration_s,
                "must be non-negative",
            ));
        }
        match event {
            EventConfig::Offload { target, .. } if !station_names.contains(target.as_str()) => {
                return Err(ValidationError::MissingReference {
                    name: target.clone(),
                    context: format!("events[{index}] offload target"),
                });
            }
            EventConfig::Fill { target, .. } if !plant_names.contains(target.as_str()) => {
                return Err(ValidationError::MissingReference {
                    name: target.clone(),
                    context: format!("events[{index}] fill target"),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

/// Parse and validate a scenario from YAML text.
pub fn scenario_from_str(yaml: &str) -> CycleResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(yaml)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Read, parse and validate a scenario file.
pub fn load_scenario_yaml(path: &Path) -> CycleResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    scenario_from_str(&content)
}
