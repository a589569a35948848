//! Analytic two-phase surrogate provider.
//!
//! The real equation of state lives behind CoolProp. For tests and quick parameter
//! exploration this module offers a closed-form saturation dome whose properties are
//! internally consistent, so every property pair the engine queries maps back to the
//! same state.
//!
//! The dome is linear in pressure:
//!
//! ```text
//! ρ_l(P) = ρ_l0 − a·P        ρ_v(P) = b·P
//! u(P,x) = c·P + x·u_lv      s(P,x) = d·P + x·s_lv
//! x(P,ρ) = (1/ρ − 1/ρ_l) / (1/ρ_v − 1/ρ_l)
//! ```
//!
//! States outside the dome extrapolate linearly in `x`, so a query at a single-phase
//! state returns a quality outside [0, 1], as a real backend does.

use crate::error::{FluidError, FluidResult};
use crate::property::{InputPair, PropertyKind};
use crate::provider::{PropertyProvider, validation};
use crate::species::Species;

/// Linear saturation-dome surrogate for para-hydrogen near storage conditions.
#[derive(Debug, Clone)]
pub struct DomeSurrogate {
    /// Saturated-liquid density intercept [kg/m³]
    pub rho_liquid_0: f64,
    /// Saturated-liquid density slope [kg/m³ per Pa]
    pub rho_liquid_slope: f64,
    /// Saturated-vapor density slope [kg/m³ per Pa]
    pub rho_vapor_slope: f64,
    /// Saturated-liquid internal energy slope [J/kg per Pa]
    pub u_liquid_slope: f64,
    /// Internal energy of vaporization [J/kg]
    pub u_vaporization: f64,
    /// Saturated-liquid entropy slope [J/(kg·K) per Pa]
    pub s_liquid_slope: f64,
    /// Entropy of vaporization [J/(kg·K)]
    pub s_vaporization: f64,
    /// Lowest pressure the surrogate resolves [Pa]
    pub p_min: f64,
    /// Highest pressure the surrogate resolves [Pa]
    pub p_max: f64,
}

impl DomeSurrogate {
    const MAX_ITER: usize = 200;
    const P_TOL: f64 = 1e-7;

    /// Surrogate tuned to para-hydrogen between roughly 1 and 10 bar.
    pub fn para_hydrogen() -> Self {
        Self {
            rho_liquid_0: 72.0,
            rho_liquid_slope: 1.0e-5,
            rho_vapor_slope: 1.2e-5,
            u_liquid_slope: 0.17,
            u_vaporization: 4.45e5,
            s_liquid_slope: 1.0e-4,
            s_vaporization: 2.0e4,
            p_min: 1.0e4,
            p_max: 2.0e6,
        }
    }

    pub fn rho_liquid(&self, p: f64) -> f64 {
        self.rho_liquid_0 - self.rho_liquid_slope * p
    }

    pub fn rho_vapor(&self, p: f64) -> f64 {
        self.rho_vapor_slope * p
    }

    /// Quality from pressure and density (unclamped).
    pub fn quality_from_pd(&self, p: f64, rho: f64) -> f64 {
        let v_l = 1.0 / self.rho_liquid(p);
        let v_v = 1.0 / self.rho_vapor(p);
        (1.0 / rho - v_l) / (v_v - v_l)
    }

    fn density_from_pq(&self, p: f64, x: f64) -> f64 {
        let v_l = 1.0 / self.rho_liquid(p);
        let v_v = 1.0 / self.rho_vapor(p);
        1.0 / (v_l + x * (v_v - v_l))
    }

    fn internal_energy(&self, p: f64, x: f64) -> f64 {
        self.u_liquid_slope * p + x * self.u_vaporization
    }

    fn entropy(&self, p: f64, x: f64) -> f64 {
        self.s_liquid_slope * p + x * self.s_vaporization
    }

    fn lookup_error(&self, input: InputPair, message: impl Into<String>) -> FluidError {
        FluidError::PropertyLookup {
            fluid: Species::ParaHydrogen,
            input,
            message: message.into(),
        }
    }

    fn check_pressure(&self, input: InputPair, p: f64) -> FluidResult<()> {
        if p < self.p_min || p > self.p_max {
            return Err(self.lookup_error(input, "pressure outside surrogate range"));
        }
        Ok(())
    }

    /// Solve u(P, x(P, ρ)) = u_target for P by bisection.
    fn pressure_from_du(&self, input: InputPair, rho: f64, u_target: f64) -> FluidResult<f64> {
        let residual = |p: f64| self.internal_energy(p, self.quality_from_pd(p, rho)) - u_target;

        let mut p_low = self.p_min;
        let mut p_high = self.p_max;
        let r_low = residual(p_low);
        let r_high = residual(p_high);
        if r_low * r_high > 0.0 {
            return Err(self.lookup_error(input, "internal energy outside surrogate range"));
        }

        for _ in 0..Self::MAX_ITER {
            let p_mid = 0.5 * (p_low + p_high);
            let r_mid = residual(p_mid);
            if r_mid == 0.0 || (p_high - p_low) < Self::P_TOL {
                return Ok(p_mid);
            }
            if (r_mid < 0.0) == (r_low < 0.0) {
                p_low = p_mid;
            } else {
                p_high = p_mid;
            }
        }

        Ok(0.5 * (p_low + p_high))
    }

    /// Resolve any supported input pair to (pressure, quality).
    fn resolve(&self, input: InputPair) -> FluidResult<(f64, f64)> {
        use PropertyKind::*;

        let value = |kind| input.value_of(kind).unwrap_or(f64::NAN);

        let (p, x) = if input.is(Pressure, Density) {
            let (p, rho) = (value(Pressure), value(Density));
            if rho <= 0.0 {
                return Err(self.lookup_error(input, "density must be positive"));
            }
            self.check_pressure(input, p)?;
            (p, self.quality_from_pd(p, rho))
        } else if input.is(Pressure, Quality) {
            let p = value(Pressure);
            self.check_pressure(input, p)?;
            (p, value(Quality))
        } else if input.is(Pressure, Entropy) {
            let p = value(Pressure);
            self.check_pressure(input, p)?;
            (p, (value(Entropy) - self.s_liquid_slope * p) / self.s_vaporization)
        } else if input.is(Pressure, InternalEnergy) {
            let p = value(Pressure);
            self.check_pressure(input, p)?;
            (
                p,
                (value(InternalEnergy) - self.u_liquid_slope * p) / self.u_vaporization,
            )
        } else if input.is(Density, InternalEnergy) {
            let rho = value(Density);
            if rho <= 0.0 {
                return Err(self.lookup_error(input, "density must be positive"));
            }
            let p = self.pressure_from_du(input, rho, value(InternalEnergy))?;
            (p, self.quality_from_pd(p, rho))
        } else {
            return Err(self.lookup_error(input, "input pair not supported by surrogate"));
        };

        let rho = self.density_from_pq(p, x);
        if !rho.is_finite() || rho <= 0.0 {
            return Err(self.lookup_error(input, "state outside surrogate dome extrapolation"));
        }
        Ok((p, x))
    }
}

impl Default for DomeSurrogate {
    fn default() -> Self {
        Self::para_hydrogen()
    }
}

impl PropertyProvider for DomeSurrogate {
    fn name(&self) -> &str {
        "DomeSurrogate"
    }

    fn species(&self) -> Species {
        Species::ParaHydrogen
    }

    fn query(&self, input: InputPair, outputs: &[PropertyKind]) -> FluidResult<Vec<f64>> {
        validation::validate_query(&input, outputs)?;

        let (p, x) = self.resolve(input)?;
        let rho = self.density_from_pq(p, x);
        let u = self.internal_energy(p, x);

        let values: Vec<f64> = outputs
            .iter()
            .map(|kind| match kind {
                PropertyKind::Pressure => p,
                PropertyKind::Density => rho,
                PropertyKind::InternalEnergy => u,
                PropertyKind::Enthalpy => u + p / rho,
                PropertyKind::Entropy => self.entropy(p, x),
                PropertyKind::Quality => x,
            })
            .collect();

        validation::validate_outputs(&values)?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lh2_core::{Tolerances, nearly_equal};

    const TOL: Tolerances = Tolerances {
        abs: 1e-6,
        rel: 1e-9,
    };

    #[test]
    fn saturation_densities() {
        let dome = DomeSurrogate::para_hydrogen();
        let rho_l = dome.saturated_liquid_density(2.0e5).unwrap();
        let rho_v = dome.saturated_vapor_density(2.0e5).unwrap();
        assert!(nearly_equal(rho_l, 70.0, TOL));
        assert!(nearly_equal(rho_v, 2.4, TOL));
        assert!(rho_l > rho_v);
    }

    #[test]
    fn pd_and_ps_agree() {
        let dome = DomeSurrogate::para_hydrogen();
        let p = 202_650.0;
        let rho = 146.0 / 13.33;
        let s = dome
            .query_one(InputPair::pd(p, rho), PropertyKind::Entropy)
            .unwrap();
        let rho_back = dome
            .query_one(InputPair::ps(p, s), PropertyKind::Density)
            .unwrap();
        assert!(nearly_equal(rho, rho_back, TOL));
    }

    #[test]
    fn du_inverts_pd() {
        let dome = DomeSurrogate::para_hydrogen();
        let p = 250_000.0;
        let rho = 57.25;
        let u = dome
            .query_one(InputPair::pd(p, rho), PropertyKind::InternalEnergy)
            .unwrap();
        let out = dome
            .query(InputPair::du(rho, u), &[PropertyKind::Pressure, PropertyKind::Density])
            .unwrap();
        assert!((out[0] - p).abs() < 1e-3);
        assert!(nearly_equal(out[1], rho, Tolerances { abs: 1e-6, rel: 1e-6 }));
    }

    #[test]
    fn single_phase_quality_is_out_of_range() {
        let dome = DomeSurrogate::para_hydrogen();
        // Denser than saturated liquid
        let x = dome
            .query_one(InputPair::pd(3.0e5, 71.5), PropertyKind::Quality)
            .unwrap();
        assert!(x < 0.0);
    }

    #[test]
    fn out_of_range_pressure_is_lookup_error() {
        let dome = DomeSurrogate::para_hydrogen();
        let err = dome
            .query_one(InputPair::pd(5.0e7, 10.0), PropertyKind::Entropy)
            .unwrap_err();
        assert!(err.is_lookup());
    }

    #[test]
    fn unsupported_pair_is_lookup_error() {
        let dome = DomeSurrogate::para_hydrogen();
        let pair = InputPair::new(PropertyKind::Entropy, 3_000.0, PropertyKind::Quality, 0.5);
        assert!(dome.query(pair, &[PropertyKind::Pressure]).unwrap_err().is_lookup());
    }
}
