//! Vessel state: one fixed-volume control volume.

use crate::diagnostics::Diagnostic;
use crate::error::{ProcessError, ProcessResult};
use lh2_core::{ensure_fraction, ensure_non_negative, ensure_positive};
use lh2_fluids::PropertyProvider;

/// A trailer or station holding two-phase para-hydrogen.
///
/// Vessels are plain values. Transitions return updated copies built with
/// [`with_mass`](Self::with_mass) and [`with_pressure`](Self::with_pressure); nothing
/// mutates a vessel that has already been recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct Vessel {
    /// Name for diagnostics and station lookup
    pub name: String,
    /// Fixed internal volume (m³)
    pub volume_m3: f64,
    /// Contained mass (kg)
    pub m_kg: f64,
    /// Tracked pressure (Pa)
    pub p_pa: f64,
    /// Design maximum pressure (Pa)
    pub max_pressure_pa: f64,
    /// Design minimum pressure (Pa)
    pub min_pressure_pa: f64,
    /// Largest usable fraction of the saturated-liquid capacity
    pub max_fill_fraction: f64,
    /// Optional absolute mass cap (kg)
    pub max_mass_kg: Option<f64>,
}

impl Vessel {
    /// Create a vessel without design limits (0 to infinity, fill fraction 1).
    pub fn new(
        name: impl Into<String>,
        volume_m3: f64,
        m_kg: f64,
        p_pa: f64,
    ) -> ProcessResult<Self> {
        ensure_positive(volume_m3, "volume_m3 must be positive")?;
        ensure_non_negative(m_kg, "m_kg must be non-negative")?;
        ensure_positive(p_pa, "p_pa must be positive")?;
        Ok(Self {
            name: name.into(),
            volume_m3,
            m_kg,
            p_pa,
            max_pressure_pa: f64::INFINITY,
            min_pressure_pa: 0.0,
            max_fill_fraction: 1.0,
            max_mass_kg: None,
        })
    }

    pub fn with_pressure_limits(mut self, min_pa: f64, max_pa: f64) -> ProcessResult<Self> {
        ensure_non_negative(min_pa, "min_pressure_pa must be non-negative")?;
        ensure_positive(max_pa, "max_pressure_pa must be positive")?;
        if min_pa > max_pa {
            return Err(ProcessError::InvalidArg {
                what: "min_pressure_pa must not exceed max_pressure_pa",
            });
        }
        self.min_pressure_pa = min_pa;
        self.max_pressure_pa = max_pa;
        Ok(self)
    }

    pub fn with_fill_fraction(mut self, fraction: f64) -> ProcessResult<Self> {
        self.max_fill_fraction = ensure_fraction(fraction, "max_fill_fraction must be in (0, 1]")?;
        Ok(self)
    }

    pub fn with_max_mass(mut self, max_mass_kg: f64) -> ProcessResult<Self> {
        ensure_positive(max_mass_kg, "max_mass_kg must be positive")?;
        self.max_mass_kg = Some(max_mass_kg);
        Ok(self)
    }

    /// Copy with a new contained mass.
    pub fn with_mass(&self, m_kg: f64) -> Self {
        Self {
            m_kg,
            ..self.clone()
        }
    }

    /// Copy with a new tracked pressure.
    pub fn with_pressure(&self, p_pa: f64) -> Self {
        Self {
            p_pa,
            ..self.clone()
        }
    }

    /// Mean density (kg/m³).
    pub fn density(&self) -> f64 {
        self.m_kg / self.volume_m3
    }

    /// Mass when holding only saturated vapor at `p_pa`.
    pub fn empty_mass(&self, provider: &dyn PropertyProvider, p_pa: f64) -> ProcessResult<f64> {
        Ok(provider.empty_mass(self.volume_m3, p_pa)?)
    }

    /// Mass when holding only saturated liquid at `p_pa`.
    pub fn full_mass(&self, provider: &dyn PropertyProvider, p_pa: f64) -> ProcessResult<f64> {
        Ok(provider.full_mass(self.volume_m3, p_pa)?)
    }

    /// Pressure-dependent usable capacity: saturated-liquid mass scaled by the fill fraction.
    pub fn capacity_mass(&self, provider: &dyn PropertyProvider, p_pa: f64) -> ProcessResult<f64> {
        Ok(self.full_mass(provider, p_pa)? * self.max_fill_fraction)
    }

    /// Maximum mass: the configured cap, or the usable capacity at `p_pa`.
    pub fn max_mass(&self, provider: &dyn PropertyProvider, p_pa: f64) -> ProcessResult<f64> {
        match self.max_mass_kg {
            Some(cap) => Ok(cap),
            None => self.capacity_mass(provider, p_pa),
        }
    }

    /// Check the saturated-liquid capacity bound at the current pressure.
    ///
    /// Returns a precondition diagnostic if the vessel holds more than its volume of
    /// saturated liquid.
    pub fn check_capacity(
        &self,
        provider: &dyn PropertyProvider,
    ) -> ProcessResult<Option<Diagnostic>> {
        let full = self.full_mass(provider, self.p_pa)?;
        if self.m_kg > full {
            return Ok(Some(Diagnostic::precondition(format!(
                "{} holds {:.2} kg, above its saturated-liquid capacity of {:.2} kg",
                self.name, self.m_kg, full
            ))));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lh2_fluids::DomeSurrogate;

    #[test]
    fn rejects_bad_geometry() {
        assert!(Vessel::new("t", 0.0, 10.0, 1.0e5).is_err());
        assert!(Vessel::new("t", 32.0, -1.0, 1.0e5).is_err());
        assert!(Vessel::new("t", 32.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn limits_are_validated() {
        let v = Vessel::new("station", 13.33, 146.0, 202_650.0).unwrap();
        assert!(v.clone().with_pressure_limits(4.0e5, 3.0e5).is_err());
        assert!(v.clone().with_fill_fraction(1.2).is_err());
        assert!(v.clone().with_max_mass(0.0).is_err());

        let v = v
            .with_pressure_limits(1.0e5, 353_312.0)
            .unwrap()
            .with_fill_fraction(0.95)
            .unwrap();
        assert_eq!(v.max_pressure_pa, 353_312.0);
        assert_eq!(v.max_fill_fraction, 0.95);
    }

    #[test]
    fn updates_leave_original_untouched() {
        let v = Vessel::new("trailer", 32.0, 1832.0, 202_650.0).unwrap();
        let heavier = v.with_mass(1900.0);
        let hotter = v.with_pressure(3.0e5);
        assert_eq!(v.m_kg, 1832.0);
        assert_eq!(heavier.m_kg, 1900.0);
        assert_eq!(hotter.p_pa, 3.0e5);
        assert_eq!(hotter.m_kg, 1832.0);
        assert!((v.density() - 57.25).abs() < 1e-12);
    }

    #[test]
    fn capacity_and_cap() {
        let dome = DomeSurrogate::default();
        let v = Vessel::new("station", 10.0, 100.0, 2.0e5)
            .unwrap()
            .with_fill_fraction(0.5)
            .unwrap();
        // rho_l(2e5) = 70 kg/m³ for the surrogate
        assert!((v.full_mass(&dome, 2.0e5).unwrap() - 700.0).abs() < 1e-9);
        assert!((v.capacity_mass(&dome, 2.0e5).unwrap() - 350.0).abs() < 1e-9);
        assert!((v.max_mass(&dome, 2.0e5).unwrap() - 350.0).abs() < 1e-9);

        let capped = v.with_max_mass(300.0).unwrap();
        assert_eq!(capped.max_mass(&dome, 2.0e5).unwrap(), 300.0);
    }

    #[test]
    fn capacity_check_flags_overfull() {
        let dome = DomeSurrogate::default();
        let ok = Vessel::new("station", 10.0, 600.0, 2.0e5).unwrap();
        assert!(ok.check_capacity(&dome).unwrap().is_none());

        let overfull = ok.with_mass(750.0);
        let diag = overfull.check_capacity(&dome).unwrap();
        assert!(diag.is_some_and(|d| d.is_precondition()));
    }
}
