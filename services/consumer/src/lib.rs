pub mod config;
pub mod delivery;
pub mod envelope;
pub mod queue;
pub mod worker;
