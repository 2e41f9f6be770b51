use serde::{Deserialize, Serialize};

/// A user's medical profile, loaded read-only per request from the external
/// profile store. Mutation is the store's concern, never the pipeline's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMedicalProfile {
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub blood_group: Option<String>,
    pub genotype: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub location: Option<UserLocation>,
}

impl UserMedicalProfile {
    /// The substitute profile used when the profile store is unreachable
    /// or the user has no stored profile.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_medications(&self) -> bool {
        !self.medications.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLocation {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub city: Option<String>,
}

impl Default for UserLocation {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            city: None,
        }
    }
}
