//! Isentropic blow-down to a lower pressure.

use crate::diagnostics::{Diagnostic, usable_quality};
use crate::error::ProcessResult;
use crate::vessel::Vessel;
use lh2_core::ensure_positive;
use lh2_fluids::{InputPair, PropertyKind, PropertyProvider};
use tracing::debug;

/// Liquid and gas inventory after venting.
///
/// Each phase is sized from its own saturated density and allotted volume, so the two
/// masses need not sum to the vessel mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSplit {
    pub m_liquid_kg: f64,
    pub m_gas_kg: f64,
}

/// Outcome of venting a vessel.
#[derive(Clone, Debug)]
pub struct VentResult {
    /// Vessel at the vent pressure with its remaining mass
    pub vessel: Vessel,
    /// Mass released to atmosphere (kg)
    pub m_vented_kg: f64,
    /// Phase inventory, absent when nothing was vented
    pub split: Option<PhaseSplit>,
    /// Clamped quality after venting, absent when nothing was vented
    pub quality_final: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Vent `vessel` down to `p_final_pa` holding entropy at its initial value.
///
/// When `p_final_pa` is not below the vessel pressure nothing is vented: the vessel comes
/// back unchanged with a precondition diagnostic and the provider is not queried.
pub fn vent_to_pressure(
    provider: &dyn PropertyProvider,
    vessel: &Vessel,
    p_final_pa: f64,
) -> ProcessResult<VentResult> {
    ensure_positive(p_final_pa, "p_final_pa must be positive")?;

    if p_final_pa >= vessel.p_pa {
        return Ok(VentResult {
            vessel: vessel.clone(),
            m_vented_kg: 0.0,
            split: None,
            quality_final: None,
            diagnostics: vec![Diagnostic::precondition(format!(
                "{} at {:.0} Pa is not above vent pressure {:.0} Pa",
                vessel.name, vessel.p_pa, p_final_pa
            ))],
        });
    }
    ensure_positive(vessel.m_kg, "vessel mass must be positive to vent")?;

    let s_initial = provider.query_one(
        InputPair::pd(vessel.p_pa, vessel.density()),
        PropertyKind::Entropy,
    )?;
    let [rho_final, x_raw] = provider.query_array(
        InputPair::ps(p_final_pa, s_initial),
        [PropertyKind::Density, PropertyKind::Quality],
    )?;

    let mut diagnostics = Vec::new();
    let x = usable_quality(x_raw, "vent_to_pressure", &mut diagnostics);

    let m_final = rho_final * vessel.volume_m3;
    let m_liquid = (1.0 - x) * m_final;
    let v_liquid = m_liquid / provider.saturated_liquid_density(p_final_pa)?;
    let m_gas = (vessel.volume_m3 - v_liquid) * provider.saturated_vapor_density(p_final_pa)?;
    let m_vented = vessel.m_kg - m_final;

    debug!(
        vessel = %vessel.name,
        p_initial = vessel.p_pa,
        p_final = p_final_pa,
        m_vented,
        "vent"
    );

    Ok(VentResult {
        vessel: vessel.with_mass(m_final).with_pressure(p_final_pa),
        m_vented_kg: m_vented,
        split: Some(PhaseSplit {
            m_liquid_kg: m_liquid,
            m_gas_kg: m_gas,
        }),
        quality_final: Some(x),
        diagnostics,
    })
}
