//! Domain layer: pure codec logic, no I/O.

pub mod errors;
pub mod pushdrop;
pub mod token;
