pub mod context;
pub mod emergency;
pub mod generate;
pub mod interactions;
pub mod location;
pub mod orchestrator;
pub mod profile_store;
pub mod safety;
