//! Network layer: owned message types and the background worker task.

pub mod types;
pub mod worker;
