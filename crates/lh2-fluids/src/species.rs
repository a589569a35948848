//! Fluid species handled by the transfer engine.

use std::fmt;

/// Hydrogen forms with an equation of state in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Species {
    /// Para-hydrogen, the equilibrium form of liquid hydrogen in storage.
    #[default]
    ParaHydrogen,
}

impl Species {
    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Species::ParaHydrogen => Pure::Parahydrogen,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_para() {
        assert_eq!(Species::default(), Species::ParaHydrogen);
        assert_eq!(Species::ParaHydrogen.to_string(), "ParaHydrogen");
    }

    #[test]
    fn maps_to_coolprop_parahydrogen() {
        assert_eq!(
            Species::ParaHydrogen.rfluids_pure(),
            rfluids::substance::Pure::Parahydrogen
        );
    }
}
