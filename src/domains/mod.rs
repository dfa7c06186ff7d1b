pub mod agent;
pub mod fleet;
pub mod geometry;
pub mod logger;

pub use agent::*;
pub use fleet::*;
pub use geometry::*;
pub use logger::*;
