//! Property kinds and two-property state specifications.

use std::fmt;

/// A thermodynamic property the provider can accept as input or return as output.
///
/// All values are SI on a mass basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Pressure [Pa]
    Pressure,
    /// Density [kg/m³]
    Density,
    /// Specific internal energy [J/kg]
    InternalEnergy,
    /// Specific enthalpy [J/kg]
    Enthalpy,
    /// Specific entropy [J/(kg·K)]
    Entropy,
    /// Vapor mass fraction [-]
    Quality,
}

impl PropertyKind {
    /// Short property code used in logs and error messages.
    pub fn code(self) -> &'static str {
        match self {
            Self::Pressure => "P",
            Self::Density => "D",
            Self::InternalEnergy => "U",
            Self::Enthalpy => "H",
            Self::Entropy => "S",
            Self::Quality => "Q",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Pressure => "Pa",
            Self::Density => "kg/m³",
            Self::InternalEnergy | Self::Enthalpy => "J/kg",
            Self::Entropy => "J/(kg·K)",
            Self::Quality => "-",
        }
    }
}

/// Two independent properties fixing a pure-fluid state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPair {
    pub first: PropertyKind,
    pub first_value: f64,
    pub second: PropertyKind,
    pub second_value: f64,
}

impl InputPair {
    pub fn new(
        first: PropertyKind,
        first_value: f64,
        second: PropertyKind,
        second_value: f64,
    ) -> Self {
        Self {
            first,
            first_value,
            second,
            second_value,
        }
    }

    /// Pressure [Pa] and density [kg/m³].
    pub fn pd(p_pa: f64, rho_kg_m3: f64) -> Self {
        Self::new(PropertyKind::Pressure, p_pa, PropertyKind::Density, rho_kg_m3)
    }

    /// Density [kg/m³] and specific internal energy [J/kg].
    pub fn du(rho_kg_m3: f64, u_j_per_kg: f64) -> Self {
        Self::new(
            PropertyKind::Density,
            rho_kg_m3,
            PropertyKind::InternalEnergy,
            u_j_per_kg,
        )
    }

    /// Pressure [Pa] and specific entropy [J/(kg·K)].
    pub fn ps(p_pa: f64, s_j_per_kg_k: f64) -> Self {
        Self::new(PropertyKind::Pressure, p_pa, PropertyKind::Entropy, s_j_per_kg_k)
    }

    /// Pressure [Pa] and vapor quality [-].
    pub fn pq(p_pa: f64, quality: f64) -> Self {
        Self::new(PropertyKind::Pressure, p_pa, PropertyKind::Quality, quality)
    }

    /// Value supplied for `kind`, if it is one of the two inputs.
    pub fn value_of(&self, kind: PropertyKind) -> Option<f64> {
        if self.first == kind {
            Some(self.first_value)
        } else if self.second == kind {
            Some(self.second_value)
        } else {
            None
        }
    }

    /// True if the pair consists of `a` and `b` in either order.
    pub fn is(&self, a: PropertyKind, b: PropertyKind) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

impl fmt::Display for InputPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} {}, {}={} {}",
            self.first.code(),
            self.first_value,
            self.first.unit(),
            self.second.code(),
            self.second_value,
            self.second.unit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_lookup_is_order_independent() {
        let pair = InputPair::new(PropertyKind::Density, 57.25, PropertyKind::Pressure, 2.0e5);
        assert_eq!(pair.value_of(PropertyKind::Pressure), Some(2.0e5));
        assert_eq!(pair.value_of(PropertyKind::Density), Some(57.25));
        assert_eq!(pair.value_of(PropertyKind::Entropy), None);
        assert!(pair.is(PropertyKind::Pressure, PropertyKind::Density));
        assert!(!pair.is(PropertyKind::Pressure, PropertyKind::Quality));
    }

    #[test]
    fn display_shows_codes() {
        let pair = InputPair::pq(131_000.0, 0.0);
        assert_eq!(pair.to_string(), "P=131000 Pa, Q=0 -");
    }
}
