//! Isochoric heating at constant mass.
//!
//! A closed vessel absorbing a steady heat leak keeps its mass and volume, so its mean
//! density is fixed and only the specific internal energy moves. Both directions are
//! provided: time needed to reach a pressure, and pressure reached after a time.

use crate::diagnostics::{Diagnostic, usable_quality};
use crate::error::ProcessResult;
use crate::vessel::Vessel;
use lh2_core::{ensure_non_negative, ensure_positive};
use lh2_fluids::{InputPair, PropertyKind, PropertyProvider};
use tracing::debug;

/// Outcome of heating a vessel to a target pressure.
#[derive(Clone, Debug)]
pub struct BoilToPressureResult {
    /// Vessel at the final pressure, same mass
    pub vessel: Vessel,
    /// Heating time (s)
    pub time_s: f64,
    /// Specific enthalpy at the final state (J/kg)
    pub h_final_j_per_kg: f64,
    /// Clamped vapor quality at the final state
    pub quality_final: f64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of heating a vessel for a fixed duration.
#[derive(Clone, Debug)]
pub struct BoilOverTimeResult {
    /// Vessel at the reached pressure, same mass
    pub vessel: Vessel,
    /// Specific internal energy after heating (J/kg)
    pub u_final_j_per_kg: f64,
    /// Clamped vapor quality after heating
    pub quality_final: f64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Time for `heat_load_w` to raise `vessel` from its pressure to `p_final_pa`.
///
/// `time = (u(P1, ρ) − u(P0, ρ)) · m / Q̇`. A final pressure below the current one yields a
/// negative time; callers only heat upward.
pub fn boil_to_pressure(
    provider: &dyn PropertyProvider,
    vessel: &Vessel,
    p_final_pa: f64,
    heat_load_w: f64,
) -> ProcessResult<BoilToPressureResult> {
    ensure_positive(vessel.m_kg, "vessel mass must be positive to boil")?;
    ensure_positive(p_final_pa, "p_final_pa must be positive")?;
    ensure_positive(heat_load_w, "heat_load_w must be positive")?;

    let rho = vessel.density();
    let u_initial =
        provider.query_one(InputPair::pd(vessel.p_pa, rho), PropertyKind::InternalEnergy)?;
    let [u_final, h_final, x_raw] = provider.query_array(
        InputPair::pd(p_final_pa, rho),
        [
            PropertyKind::InternalEnergy,
            PropertyKind::Enthalpy,
            PropertyKind::Quality,
        ],
    )?;

    let mut diagnostics = Vec::new();
    let quality_final = usable_quality(x_raw, "boil_to_pressure", &mut diagnostics);

    let time_s = (u_final - u_initial) * vessel.m_kg / heat_load_w;
    debug!(
        vessel = %vessel.name,
        p_initial = vessel.p_pa,
        p_final = p_final_pa,
        time_s,
        "boil to pressure"
    );

    Ok(BoilToPressureResult {
        vessel: vessel.with_pressure(p_final_pa),
        time_s,
        h_final_j_per_kg: h_final,
        quality_final,
        diagnostics,
    })
}

/// Pressure reached after `heat_load_w` heats `vessel` for `duration_s`.
///
/// `u_final = u(P0, ρ) + Q̇ · t / m`, then pressure and quality at (ρ, u_final).
pub fn boil_over_time(
    provider: &dyn PropertyProvider,
    vessel: &Vessel,
    duration_s: f64,
    heat_load_w: f64,
) -> ProcessResult<BoilOverTimeResult> {
    ensure_positive(vessel.m_kg, "vessel mass must be positive to boil")?;
    ensure_non_negative(duration_s, "duration_s must be non-negative")?;
    ensure_non_negative(heat_load_w, "heat_load_w must be non-negative")?;

    let rho = vessel.density();
    let u_initial =
        provider.query_one(InputPair::pd(vessel.p_pa, rho), PropertyKind::InternalEnergy)?;
    let u_final = u_initial + heat_load_w * duration_s / vessel.m_kg;

    let [p_final, x_raw] = provider.query_array(
        InputPair::du(rho, u_final),
        [PropertyKind::Pressure, PropertyKind::Quality],
    )?;

    let mut diagnostics = Vec::new();
    let quality_final = usable_quality(x_raw, "boil_over_time", &mut diagnostics);
    debug!(
        vessel = %vessel.name,
        p_initial = vessel.p_pa,
        p_final,
        duration_s,
        "boil over time"
    );

    Ok(BoilOverTimeResult {
        vessel: vessel.with_pressure(p_final),
        u_final_j_per_kg: u_final,
        quality_final,
        diagnostics,
    })
}
