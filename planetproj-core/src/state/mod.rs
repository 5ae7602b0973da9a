//! Per-device probe state machine
//!
//! Each device walks `Start → Probing → {Alive, Dead}` once per cycle.
//! Nothing carries over between cycles.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::ProbeState;
