pub mod profile;
pub mod query;
pub mod response;

pub use profile::{UserLocation, UserMedicalProfile};
pub use query::{MedicalQuery, QueryContext};
pub use response::{MedicalResponse, ResponseMetadata, ResponseType};
