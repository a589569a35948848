//! Physical-state transitions for trailer and station vessels.
//!
//! Provides:
//! - `Vessel`: one control volume (trailer or station) with immutable updates
//! - Isochoric heating: `boil_to_pressure`, `boil_over_time`
//! - Isentropic blow-down: `vent_to_pressure`
//! - Liquid transfer: `offload_rising_pressure` (stepwise), `offload_constant_pressure`
//! - Plant refill: `fill_at_constant_pressure`
//! - `Diagnostic`: recoverable conditions reported alongside results
//!
//! Every transition takes its input vessels by reference and returns new vessel values.
//! Thermodynamic properties come exclusively from the `PropertyProvider` passed in.

pub mod boil;
pub mod diagnostics;
pub mod error;
pub mod fill;
pub mod offload;
pub mod vent;
pub mod vessel;

pub use boil::{BoilOverTimeResult, BoilToPressureResult, boil_over_time, boil_to_pressure};
pub use diagnostics::{Diagnostic, StopReason};
pub use error::{ProcessError, ProcessResult};
pub use fill::{FillResult, fill_at_constant_pressure};
pub use offload::{
    ConstantOffloadResult, ConstantPressureMode, RisingOffloadOptions, RisingOffloadResult,
    offload_constant_pressure, offload_rising_pressure,
};
pub use vent::{PhaseSplit, VentResult, vent_to_pressure};
pub use vessel::Vessel;
