mod violation_handler;

pub use violation_handler::*;
