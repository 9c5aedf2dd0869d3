//! Pipeline tests: the instruction pool, the register protocol, hazard
//! detection and whole traces driven through the simulator.

pub mod pool;
