//! Shared fixtures: the reference trailer and station at offload conditions.

#![allow(dead_code)]

use lh2_fluids::DomeSurrogate;
use lh2_process::Vessel;

pub const P_OFFLOAD_START: f64 = 202_650.0;
pub const P_STATION_MAX: f64 = 353_312.0;
pub const P_TRAILER_MAX: f64 = 1_204_514.0;
pub const HEAT_LOAD_W: f64 = 40.7;

pub fn provider() -> DomeSurrogate {
    DomeSurrogate::para_hydrogen()
}

pub fn trailer(m_kg: f64, p_pa: f64) -> Vessel {
    Vessel::new("trailer", 32.0, m_kg, p_pa)
        .and_then(|v| v.with_pressure_limits(0.0, P_TRAILER_MAX))
        .unwrap()
}

pub fn station(m_kg: f64, p_pa: f64) -> Vessel {
    Vessel::new("station", 13.33, m_kg, p_pa)
        .and_then(|v| v.with_pressure_limits(0.0, P_STATION_MAX))
        .and_then(|v| v.with_fill_fraction(0.95))
        .unwrap()
}
