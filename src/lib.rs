pub mod adapter_env;
pub mod apis;
pub mod configuration;
pub mod errors;
pub mod resources;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod version;
