pub mod polygon;
pub mod projection;
pub mod types;
pub mod waypoints;

pub use polygon::*;
pub use projection::*;
pub use types::*;
pub use waypoints::*;
