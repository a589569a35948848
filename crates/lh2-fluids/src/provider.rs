//! Property provider trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::property::{InputPair, PropertyKind};
use crate::species::Species;

/// Equation-of-state oracle for a single pure fluid.
///
/// Given two independent properties, returns the requested outputs in SI mass-basis units,
/// one value per requested kind and in the same order. Implementations must be thread-safe
/// (Send + Sync) and stateless per call so that independent runs can share one instance.
///
/// A state the backend cannot resolve is reported as [`FluidError::PropertyLookup`]; callers
/// propagate it rather than substituting a default.
pub trait PropertyProvider: Send + Sync {
    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// The fluid this provider evaluates.
    fn species(&self) -> Species;

    /// Evaluate `outputs` at the state fixed by `input`.
    fn query(&self, input: InputPair, outputs: &[PropertyKind]) -> FluidResult<Vec<f64>>;

    /// Evaluate a single output.
    fn query_one(&self, input: InputPair, output: PropertyKind) -> FluidResult<f64> {
        let values = self.query(input, &[output])?;
        match values.as_slice() {
            [value] => Ok(*value),
            _ => Err(FluidError::OutputCount {
                expected: 1,
                got: values.len(),
            }),
        }
    }

    /// Saturated-liquid density [kg/m³] at `p_pa`.
    fn saturated_liquid_density(&self, p_pa: f64) -> FluidResult<f64> {
        self.query_one(InputPair::pq(p_pa, 0.0), PropertyKind::Density)
    }

    /// Saturated-vapor density [kg/m³] at `p_pa`.
    fn saturated_vapor_density(&self, p_pa: f64) -> FluidResult<f64> {
        self.query_one(InputPair::pq(p_pa, 1.0), PropertyKind::Density)
    }

    /// Mass [kg] of a vessel of `volume_m3` holding only saturated vapor at `p_pa`.
    fn empty_mass(&self, volume_m3: f64, p_pa: f64) -> FluidResult<f64> {
        Ok(volume_m3 * self.saturated_vapor_density(p_pa)?)
    }

    /// Mass [kg] of a vessel of `volume_m3` holding only saturated liquid at `p_pa`.
    fn full_mass(&self, volume_m3: f64, p_pa: f64) -> FluidResult<f64> {
        Ok(volume_m3 * self.saturated_liquid_density(p_pa)?)
    }
}

impl dyn PropertyProvider + '_ {
    /// Evaluate exactly `N` outputs and return them in request order.
    ///
    /// A backend answering with any other number of values is reported as
    /// [`FluidError::OutputCount`] instead of being indexed.
    pub fn query_array<const N: usize>(
        &self,
        input: InputPair,
        outputs: [PropertyKind; N],
    ) -> FluidResult<[f64; N]> {
        let values = self.query(input, &outputs)?;
        <[f64; N]>::try_from(values).map_err(|values| FluidError::OutputCount {
            expected: N,
            got: values.len(),
        })
    }
}

impl<P: PropertyProvider + ?Sized> PropertyProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn species(&self) -> Species {
        (**self).species()
    }

    fn query(&self, input: InputPair, outputs: &[PropertyKind]) -> FluidResult<Vec<f64>> {
        (**self).query(input, outputs)
    }
}

/// Validation helpers shared by backends.
pub(crate) mod validation {
    use super::*;

    /// Reject malformed queries before they reach a backend.
    pub fn validate_query(input: &InputPair, outputs: &[PropertyKind]) -> FluidResult<()> {
        if outputs.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "at least one output property must be requested",
            });
        }
        if input.first == input.second {
            return Err(FluidError::InvalidArg {
                what: "input pair must name two different properties",
            });
        }
        if !input.first_value.is_finite() || !input.second_value.is_finite() {
            return Err(FluidError::InvalidArg {
                what: "input values must be finite",
            });
        }
        Ok(())
    }

    /// Ensure every backend output is finite.
    pub fn validate_outputs(values: &[f64]) -> FluidResult<()> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FluidError::NonPhysical {
                what: "provider output must be finite",
            });
        }
        Ok(())
    }
}
