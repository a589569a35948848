//! lh2-fluids: equation-of-state property access for the transfer engine.
//!
//! Provides:
//! - Property kinds and two-property input pairs
//! - `PropertyProvider` trait: the only way the engine obtains thermodynamic properties
//! - Vapor quality clamp policy for single-phase artifacts
//! - CoolProp backend (via `rfluids`) for para-hydrogen
//! - Analytic two-phase surrogate for tests and offline exploration
//!
//! # Architecture
//!
//! The engine never evaluates an equation of state itself. Every operation receives a
//! `&dyn PropertyProvider` (or a generic `P: PropertyProvider`) built by the caller, so
//! concurrent runs and alternative backends coexist without process-wide state.
//!
//! # Example
//!
//! ```no_run
//! use lh2_fluids::{CoolPropProvider, InputPair, PropertyKind, PropertyProvider};
//!
//! let provider: &dyn PropertyProvider = &CoolPropProvider::para_hydrogen();
//! let [u, x] = provider
//!     .query_array(
//!         InputPair::pd(202_650.0, 57.25),
//!         [PropertyKind::InternalEnergy, PropertyKind::Quality],
//!     )
//!     .unwrap();
//! println!("u = {} J/kg, x = {}", u, x);
//! ```

pub mod coolprop;
pub mod counting;
pub mod error;
pub mod property;
pub mod provider;
pub mod quality;
pub mod species;
pub mod surrogate;

// Re-exports for ergonomics
pub use coolprop::CoolPropProvider;
pub use counting::CountingProvider;
pub use error::{FluidError, FluidResult};
pub use property::{InputPair, PropertyKind};
pub use provider::PropertyProvider;
pub use quality::{ClampedQuality, clamp_quality};
pub use species::Species;
pub use surrogate::DomeSurrogate;
