//! Domain models for the dosing core.

mod assessment;
mod calculation;
mod dose;
mod preparation;
mod reference;

pub use assessment::*;
pub use calculation::*;
pub use dose::*;
pub use preparation::*;
pub use reference::*;
