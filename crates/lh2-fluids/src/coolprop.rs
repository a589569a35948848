//! CoolProp-based property provider.

use crate::error::{FluidError, FluidResult};
use crate::property::{InputPair, PropertyKind};
use crate::provider::{PropertyProvider, validation};
use crate::species::Species;
use rfluids::prelude::*;

/// CoolProp backend for hydrogen properties.
///
/// Thread-safe: rfluids Fluid instances are created per query, so one provider can be shared
/// by concurrent runs.
#[derive(Debug, Clone)]
pub struct CoolPropProvider {
    species: Species,
}

impl CoolPropProvider {
    /// Create a provider for the given hydrogen species.
    pub fn new(species: Species) -> Self {
        Self { species }
    }

    /// Provider for para-hydrogen, the default fluid of the engine.
    pub fn para_hydrogen() -> Self {
        Self::new(Species::ParaHydrogen)
    }

    fn lookup_error(&self, input: InputPair, message: String) -> FluidError {
        FluidError::PropertyLookup {
            fluid: self.species,
            input,
            message,
        }
    }

    /// Create a Fluid instance at the state fixed by `input`.
    fn fluid_in_state(&self, input: InputPair) -> FluidResult<Fluid> {
        Fluid::from(self.species.rfluids_pure())
            .in_state(
                fluid_input(input.first, input.first_value),
                fluid_input(input.second, input.second_value),
            )
            .map_err(|e| self.lookup_error(input, format!("rfluids error: {}", e)))
    }

    /// Read one output from an already-updated Fluid.
    fn read(&self, fluid: &mut Fluid, input: InputPair, kind: PropertyKind) -> FluidResult<f64> {
        let value = match kind {
            PropertyKind::Pressure => fluid.pressure(),
            PropertyKind::Density => fluid.density(),
            PropertyKind::InternalEnergy => fluid.internal_energy(),
            PropertyKind::Enthalpy => fluid.enthalpy(),
            PropertyKind::Entropy => fluid.entropy(),
            PropertyKind::Quality => fluid.quality(),
        };
        value.map_err(|e| {
            self.lookup_error(
                input,
                format!("rfluids error getting {}: {}", kind.code(), e),
            )
        })
    }
}

impl Default for CoolPropProvider {
    fn default() -> Self {
        Self::para_hydrogen()
    }
}

fn fluid_input(kind: PropertyKind, value: f64) -> FluidInput {
    match kind {
        PropertyKind::Pressure => FluidInput::pressure(value),
        PropertyKind::Density => FluidInput::density(value),
        PropertyKind::InternalEnergy => FluidInput::internal_energy(value),
        PropertyKind::Enthalpy => FluidInput::enthalpy(value),
        PropertyKind::Entropy => FluidInput::entropy(value),
        PropertyKind::Quality => FluidInput::quality(value),
    }
}

impl PropertyProvider for CoolPropProvider {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn species(&self) -> Species {
        self.species
    }

    fn query(&self, input: InputPair, outputs: &[PropertyKind]) -> FluidResult<Vec<f64>> {
        validation::validate_query(&input, outputs)?;

        let mut fluid = self.fluid_in_state(input)?;
        let values = outputs
            .iter()
            .map(|&kind| self.read(&mut fluid, input, kind))
            .collect::<FluidResult<Vec<f64>>>()?;

        validation::validate_outputs(&values)?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name() {
        let provider = CoolPropProvider::default();
        assert_eq!(provider.name(), "CoolProp");
        assert_eq!(provider.species(), Species::ParaHydrogen);
    }

    #[test]
    fn malformed_query_rejected_before_backend() {
        let provider = CoolPropProvider::para_hydrogen();
        let result = provider.query(InputPair::pd(2.0e5, 60.0), &[]);
        assert!(matches!(result, Err(FluidError::InvalidArg { .. })));
    }
}
