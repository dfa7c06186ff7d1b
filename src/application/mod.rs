pub mod command_processor;
pub mod ground_control;

pub use command_processor::*;
pub use ground_control::*;
