pub mod coordinate;
pub mod derived;
pub mod panel;
pub mod region;

pub use coordinate::*;
pub use derived::*;
pub use panel::*;
pub use region::{resolve_region, Region};
