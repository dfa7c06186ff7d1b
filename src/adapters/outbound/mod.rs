pub mod geofence_source;

pub use geofence_source::*;
