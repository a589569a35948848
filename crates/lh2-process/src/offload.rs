//! Liquid transfer from trailer to station.
//!
//! Two modes are modeled:
//!
//! - **Rising pressure**: trailer and station form one combined control volume whose
//!   pressure is raised quasi-statically in fixed steps. The station compresses
//!   isentropically at each step and the volume it frees is back-filled with saturated
//!   liquid from the trailer.
//! - **Constant pressure**: a single mass balance at fixed pressure, moving as much
//!   liquid as the trailer can spare and the station can take.

use crate::diagnostics::{Diagnostic, StopReason, usable_quality};
use crate::error::ProcessResult;
use crate::vessel::Vessel;
use lh2_core::ensure_positive;
use lh2_fluids::{InputPair, PropertyKind, PropertyProvider};
use tracing::{debug, info, warn};

/// Step control for the rising-pressure offload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RisingOffloadOptions {
    /// Pressure increment per step (Pa)
    pub dp_pa: f64,
    /// Step budget before giving up without a physical stop
    pub max_steps: usize,
}

impl Default for RisingOffloadOptions {
    fn default() -> Self {
        Self {
            dp_pa: 1000.0,
            max_steps: 1000,
        }
    }
}

/// Outcome of the rising-pressure offload.
///
/// `trailer` and `station` are the last committed state, so the operation can be resumed
/// from them.
#[derive(Clone, Debug)]
pub struct RisingOffloadResult {
    pub trailer: Vessel,
    pub station: Vessel,
    /// Committed pressures, starting with the initial pressure (Pa)
    pub pressure_path_pa: Vec<f64>,
    /// Cumulative transferred mass at each committed pressure (kg)
    pub transferred_path_kg: Vec<f64>,
    /// Total mass moved into the station (kg)
    pub m_transferred_kg: f64,
    /// Heat absorbed by the combined volume, Σ Δu · m (J)
    pub q_total_j: f64,
    /// Committed steps
    pub steps: usize,
    pub stop_reason: StopReason,
    pub diagnostics: Vec<Diagnostic>,
}

impl RisingOffloadResult {
    fn unchanged(trailer: &Vessel, station: &Vessel, diagnostic: Diagnostic) -> Self {
        Self {
            trailer: trailer.clone(),
            station: station.clone(),
            pressure_path_pa: vec![trailer.p_pa],
            transferred_path_kg: vec![0.0],
            m_transferred_kg: 0.0,
            q_total_j: 0.0,
            steps: 0,
            stop_reason: StopReason::Precondition,
            diagnostics: vec![diagnostic, Diagnostic::Stopped(StopReason::Precondition)],
        }
    }

    /// Final committed pressure (Pa).
    pub fn final_pressure_pa(&self) -> f64 {
        self.trailer.p_pa
    }
}

/// Raise the matched trailer/station pressure in steps of `options.dp_pa`, moving liquid
/// into the station until a stop condition triggers.
///
/// The offload starts at the trailer pressure. A trial step is discarded, and the last
/// committed state returned, when any of these hold at the trial pressure:
///
/// 1. it reaches `min(trailer.max_pressure_pa, station.max_pressure_pa)`
/// 2. the station mass would reach its maximum mass
/// 3. the trailer mass would drop below its vapor-empty mass
///
/// A trailer at or below its vapor-empty mass, or vessels outside their saturated bounds,
/// short-circuit with a precondition diagnostic and no transfer.
pub fn offload_rising_pressure(
    provider: &dyn PropertyProvider,
    trailer: &Vessel,
    station: &Vessel,
    options: &RisingOffloadOptions,
) -> ProcessResult<RisingOffloadResult> {
    ensure_positive(options.dp_pa, "dp_pa must be positive")?;

    let p_start = trailer.p_pa;
    if let Some(reason) = rising_precondition(provider, trailer, station, p_start)? {
        return Ok(RisingOffloadResult::unchanged(
            trailer,
            station,
            Diagnostic::precondition(reason),
        ));
    }

    let p_limit = trailer.max_pressure_pa.min(station.max_pressure_pa);
    let v_station = station.volume_m3;
    let v_trailer = trailer.volume_m3;
    let m_combined = trailer.m_kg + station.m_kg;
    let rho_combined = m_combined / (v_station + v_trailer);

    let mut p = p_start;
    let mut m_station = station.m_kg;
    let mut m_trailer = trailer.m_kg;
    let mut u_combined =
        provider.query_one(InputPair::pd(p, rho_combined), PropertyKind::InternalEnergy)?;
    let mut s_station =
        provider.query_one(InputPair::pd(p, m_station / v_station), PropertyKind::Entropy)?;

    let mut pressure_path_pa = vec![p];
    let mut transferred_path_kg = vec![0.0];
    let mut m_transferred = 0.0;
    let mut q_total = 0.0;
    let mut steps = 0;
    let mut stop_reason = StopReason::StepLimit;

    while steps < options.max_steps {
        let p_trial = p + options.dp_pa;
        if p_trial >= p_limit {
            stop_reason = StopReason::PressureLimit;
            break;
        }

        let u_trial =
            provider.query_one(InputPair::pd(p_trial, rho_combined), PropertyKind::InternalEnergy)?;
        let rho_station_compressed =
            provider.query_one(InputPair::ps(p_trial, s_station), PropertyKind::Density)?;
        let v_station_compressed = m_station / rho_station_compressed;

        let rho_liquid = provider.saturated_liquid_density(p_trial)?;
        let dm = (v_station - v_station_compressed) * rho_liquid;
        let m_station_trial = m_station + dm;
        let m_trailer_trial = m_trailer - dm;

        let m_trailer_min = trailer.empty_mass(provider, p_trial)?;
        let m_station_max = match station.max_mass_kg {
            Some(cap) => cap,
            None => v_station * rho_liquid * station.max_fill_fraction,
        };

        if m_station_trial >= m_station_max {
            stop_reason = StopReason::StationFull;
            break;
        }
        if m_trailer_trial < m_trailer_min {
            stop_reason = StopReason::TrailerEmpty;
            break;
        }

        q_total += (u_trial - u_combined) * m_combined;
        u_combined = u_trial;
        p = p_trial;
        m_station = m_station_trial;
        m_trailer = m_trailer_trial;
        m_transferred += dm;
        s_station =
            provider.query_one(InputPair::pd(p, m_station / v_station), PropertyKind::Entropy)?;
        steps += 1;

        pressure_path_pa.push(p);
        transferred_path_kg.push(m_transferred);
        debug!(step = steps, p, dm, m_transferred, "rising offload step");
    }

    let mut diagnostics = Vec::new();
    if stop_reason == StopReason::StepLimit {
        warn!(steps, p, "rising offload hit its step limit");
        diagnostics.push(Diagnostic::StepLimitReached { steps });
    }
    diagnostics.push(Diagnostic::Stopped(stop_reason));
    info!(
        station = %station.name,
        %stop_reason,
        steps,
        p_final = p,
        m_transferred,
        "rising offload finished"
    );

    Ok(RisingOffloadResult {
        trailer: trailer.with_mass(m_trailer).with_pressure(p),
        station: station.with_mass(m_station).with_pressure(p),
        pressure_path_pa,
        transferred_path_kg,
        m_transferred_kg: m_transferred,
        q_total_j: q_total,
        steps,
        stop_reason,
        diagnostics,
    })
}

/// Check both vessels against their saturated bounds at `p_pa`.
///
/// Bounds are fetched lazily so a trailer that is already empty costs a single query.
fn rising_precondition(
    provider: &dyn PropertyProvider,
    trailer: &Vessel,
    station: &Vessel,
    p_pa: f64,
) -> ProcessResult<Option<String>> {
    let rho_vapor = provider.saturated_vapor_density(p_pa)?;
    if trailer.m_kg <= trailer.volume_m3 * rho_vapor {
        return Ok(Some(format!("Trailer {} is empty", trailer.name)));
    }

    let rho_liquid = provider.saturated_liquid_density(p_pa)?;
    if trailer.m_kg > trailer.volume_m3 * rho_liquid {
        return Ok(Some(format!("Trailer {} is overfull", trailer.name)));
    }
    if station.m_kg < station.volume_m3 * rho_vapor {
        return Ok(Some(format!("Station {} is below its empty mass", station.name)));
    }
    if station.m_kg > station.volume_m3 * rho_liquid {
        return Ok(Some(format!("Station {} is overfull", station.name)));
    }
    Ok(None)
}

/// Whether displaced station gas is vented during a constant-pressure transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConstantPressureMode {
    /// Displaced gas stays in the system.
    #[default]
    NoVent,
    /// Vapor displaced by incoming liquid is vented: `(Δm / ρ_l) · ρ_v`.
    VentDisplacedGas,
}

/// Outcome of the constant-pressure offload.
#[derive(Clone, Debug)]
pub struct ConstantOffloadResult {
    pub trailer: Vessel,
    pub station: Vessel,
    /// Mass moved into the station (kg), never negative
    pub m_transferred_kg: f64,
    /// Liquid the trailer holds above its vapor-empty mass (kg)
    pub m_liquid_available_kg: f64,
    /// Mass the station can take before its usable capacity (kg)
    pub m_capacity_remaining_kg: f64,
    /// Displaced gas vented by the station (kg), zero for `NoVent`
    pub m_gas_vented_kg: f64,
    /// Trailer energy change, (u_final − u_initial) · m_final (J)
    pub energy_added_j: f64,
    pub u_trailer_final_j_per_kg: f64,
    pub u_station_final_j_per_kg: f64,
    /// Station liquid inventory, reported for `VentDisplacedGas` (kg)
    pub station_liquid_kg: Option<f64>,
    /// Station gas inventory, reported for `VentDisplacedGas` (kg)
    pub station_gas_kg: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Move liquid from trailer to station at fixed `p_pa`.
///
/// `transfer = max(0, min(m_trailer − V_t·ρ_v, V_s·ρ_l·f_max − m_station))`. The station
/// mass grows by the full transfer in both modes; vented displaced gas is reported
/// separately.
pub fn offload_constant_pressure(
    provider: &dyn PropertyProvider,
    trailer: &Vessel,
    station: &Vessel,
    p_pa: f64,
    mode: ConstantPressureMode,
) -> ProcessResult<ConstantOffloadResult> {
    ensure_positive(p_pa, "p_pa must be positive")?;
    ensure_positive(trailer.m_kg, "trailer mass must be positive")?;
    ensure_positive(station.m_kg, "station mass must be positive")?;

    let rho_liquid = provider.saturated_liquid_density(p_pa)?;
    let rho_vapor = provider.saturated_vapor_density(p_pa)?;

    let m_available = trailer.m_kg - trailer.volume_m3 * rho_vapor;
    let m_capacity = station.volume_m3 * rho_liquid * station.max_fill_fraction - station.m_kg;
    let m_transfer = m_available.min(m_capacity).max(0.0);

    let m_trailer_final = trailer.m_kg - m_transfer;
    let m_station_final = station.m_kg + m_transfer;

    let u_trailer_initial =
        provider.query_one(InputPair::pd(p_pa, trailer.density()), PropertyKind::InternalEnergy)?;
    let u_trailer_final = provider.query_one(
        InputPair::pd(p_pa, m_trailer_final / trailer.volume_m3),
        PropertyKind::InternalEnergy,
    )?;
    let energy_added = (u_trailer_final - u_trailer_initial) * m_trailer_final;

    let mut diagnostics = Vec::new();
    let station_final = InputPair::pd(p_pa, m_station_final / station.volume_m3);
    let (u_station_final, m_gas_vented, station_liquid, station_gas) = match mode {
        ConstantPressureMode::NoVent => {
            let u = provider.query_one(station_final, PropertyKind::InternalEnergy)?;
            (u, 0.0, None, None)
        }
        ConstantPressureMode::VentDisplacedGas => {
            let [u, x_raw] = provider.query_array(
                station_final,
                [PropertyKind::InternalEnergy, PropertyKind::Quality],
            )?;
            let x = usable_quality(x_raw, "offload_constant_pressure", &mut diagnostics);
            let gas_vented = m_transfer / rho_liquid * rho_vapor;
            (
                u,
                gas_vented,
                Some((1.0 - x) * m_station_final),
                Some(x * m_station_final),
            )
        }
    };

    debug!(
        station = %station.name,
        p = p_pa,
        m_transfer,
        m_gas_vented,
        "constant-pressure offload"
    );

    Ok(ConstantOffloadResult {
        trailer: trailer.with_mass(m_trailer_final).with_pressure(p_pa),
        station: station.with_mass(m_station_final).with_pressure(p_pa),
        m_transferred_kg: m_transfer,
        m_liquid_available_kg: m_available,
        m_capacity_remaining_kg: m_capacity,
        m_gas_vented_kg: m_gas_vented,
        energy_added_j: energy_added,
        u_trailer_final_j_per_kg: u_trailer_final,
        u_station_final_j_per_kg: u_station_final,
        station_liquid_kg: station_liquid,
        station_gas_kg: station_gas,
        diagnostics,
    })
}
