pub mod arbitrator;
pub mod backend;
pub mod grid;
pub mod log;
pub mod metrics;
pub mod recap;
pub mod season;
pub mod session;
pub mod tracker;
