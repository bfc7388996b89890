//! CLI command implementations.

mod ask;
mod doctor;
mod run;
mod status;

pub use ask::run_ask;
pub use doctor::run_doctor;
pub use run::run_pipeline;
pub use status::run_status;
