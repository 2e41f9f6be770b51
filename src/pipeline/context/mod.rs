//! Query enrichment: terminology extraction, condition inference, and
//! prompt assembly from the user's medical profile.

pub mod builder;
pub mod terminology;

pub use builder::{BuiltContext, MedicalContextBuilder};
