//! Shared fixtures for cycle-level tests.

#![allow(dead_code)]

use lh2_cycle::{EventConfig, PlantConfig, Scenario, StationConfig, VesselConfig};
use lh2_fluids::DomeSurrogate;

/// Route `tracing` output through the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

pub fn provider() -> DomeSurrogate {
    DomeSurrogate::para_hydrogen()
}

pub fn station_config(name: &str, mass_kg: f64, vent_pressure_pa: Option<f64>) -> StationConfig {
    StationConfig {
        vessel: VesselConfig {
            name: name.to_string(),
            volume_m3: 13.33,
            mass_kg,
            pressure_pa: 202_650.0,
            max_pressure_pa: 400_000.0,
            min_pressure_pa: 0.0,
            max_fill_fraction: 0.95,
            max_mass_kg: None,
        },
        vent_pressure_pa,
    }
}

/// Reference trailer serving two stations, the second with a vent set point.
pub fn two_station_scenario() -> Scenario {
    let mut scenario = Scenario::reference();
    scenario.stations = vec![
        station_config("north", 146.0, None),
        station_config("south", 300.0, Some(360_000.0)),
    ];
    scenario.plants = vec![PlantConfig {
        name: "plant".into(),
        fill_pressure_pa: 131_000.0,
    }];
    scenario.events = vec![
        EventConfig::Offload {
            target: "north".into(),
            duration_s: 1800.0,
        },
        EventConfig::Travel {
            duration_s: 7200.0,
        },
        EventConfig::Offload {
            target: "south".into(),
            duration_s: 1800.0,
        },
        EventConfig::Travel {
            duration_s: 86_400.0,
        },
        EventConfig::Fill {
            target: "plant".into(),
            duration_s: 3600.0,
        },
    ];
    scenario
}
