//! Refill at constant pressure.

use crate::diagnostics::{Diagnostic, usable_quality};
use crate::error::ProcessResult;
use crate::vessel::Vessel;
use lh2_core::ensure_positive;
use lh2_fluids::{InputPair, PropertyKind, PropertyProvider};
use tracing::debug;

/// Outcome of refilling a vessel.
#[derive(Clone, Debug)]
pub struct FillResult {
    /// Vessel holding `m_final` at the fill pressure
    pub vessel: Vessel,
    /// m_final − m_initial (kg)
    pub change_mass_kg: f64,
    /// m_final·(1 − x_final) − m_initial·(1 − x_initial) (kg)
    pub m_liquid_added_kg: f64,
    /// m_initial·x_initial − m_final·x_final (kg)
    pub m_gas_added_kg: f64,
    pub quality_initial: f64,
    pub quality_final: f64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fill `vessel` to `m_final_kg` at fixed `p_pa` and report the phase split of the change.
///
/// The gas term is initial minus final: vapor space shrinks as liquid comes in, so a
/// normal fill reports positive gas added when vapor condenses.
///
/// A target above the saturated-liquid capacity at `p_pa` still yields the (clamped)
/// accounting, but carries a precondition diagnostic so callers can refuse to commit it.
pub fn fill_at_constant_pressure(
    provider: &dyn PropertyProvider,
    vessel: &Vessel,
    m_final_kg: f64,
    p_pa: f64,
) -> ProcessResult<FillResult> {
    let m_initial = ensure_positive(vessel.m_kg, "vessel mass must be positive to fill")?;
    let m_final = ensure_positive(m_final_kg, "m_final_kg must be positive")?;
    ensure_positive(p_pa, "p_pa must be positive")?;

    let x_initial_raw =
        provider.query_one(InputPair::pd(p_pa, vessel.density()), PropertyKind::Quality)?;
    let x_final_raw = provider.query_one(
        InputPair::pd(p_pa, m_final / vessel.volume_m3),
        PropertyKind::Quality,
    )?;

    let mut diagnostics = Vec::new();
    let x_initial = usable_quality(x_initial_raw, "fill_at_constant_pressure", &mut diagnostics);
    let x_final = usable_quality(x_final_raw, "fill_at_constant_pressure", &mut diagnostics);

    let m_liquid_added = m_final * (1.0 - x_final) - m_initial * (1.0 - x_initial);
    let m_gas_added = m_initial * x_initial - m_final * x_final;
    let change_mass = m_final - m_initial;

    let filled = vessel.with_mass(m_final).with_pressure(p_pa);
    if let Some(violation) = filled.check_capacity(provider)? {
        diagnostics.push(violation);
    }

    debug!(
        vessel = %vessel.name,
        m_initial,
        m_final,
        m_liquid_added,
        m_gas_added,
        "fill"
    );

    Ok(FillResult {
        vessel: filled,
        change_mass_kg: change_mass,
        m_liquid_added_kg: m_liquid_added,
        m_gas_added_kg: m_gas_added,
        quality_initial: x_initial,
        quality_final: x_final,
        diagnostics,
    })
}
