//! Country-specific medical context: emergency numbers, regulatory notes,
//! and regional health considerations. A simple lookup collaborator;
//! failures here are always recovered with the default context (fail-open).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Regional medical context embedded into the generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryMedicalInfo {
    pub emergency_number: String,
    pub common_diseases: Vec<String>,
    pub vaccination_requirements: Vec<String>,
    pub healthcare_system_info: String,
    pub drug_regulations: Vec<String>,
    pub climate_considerations: Vec<String>,
}

impl CountryMedicalInfo {
    /// The substitute context used when location lookup fails or the
    /// country is unknown.
    pub fn default_context() -> Self {
        Self {
            emergency_number: "911".to_string(),
            common_diseases: Vec::new(),
            vaccination_requirements: Vec::new(),
            healthcare_system_info:
                "Healthcare access varies by region; consult a local provider.".to_string(),
            drug_regulations: vec![
                "Prescription requirements vary by country.".to_string(),
            ],
            climate_considerations: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("No medical context for country: {0}")]
    UnknownCountry(String),

    #[error("Location service unavailable: {0}")]
    Unavailable(String),
}

/// Provider of country-specific medical context.
#[async_trait]
pub trait LocationInfoSource: Send + Sync {
    async fn country_info(
        &self,
        country_code: &str,
        city: Option<&str>,
    ) -> Result<CountryMedicalInfo, LocationError>;
}

/// Emergency number for a country code, falling back to 911. Infallible so
/// the emergency path never depends on a lookup that can fail.
pub fn emergency_number_for(country_code: &str) -> &'static str {
    match country_code.to_uppercase().as_str() {
        "US" | "CA" | "MX" | "PH" => "911",
        "GB" => "999",
        "NG" => "112",
        "IN" => "112",
        "DE" | "FR" | "ES" | "IT" | "NL" => "112",
        "AU" => "000",
        "NZ" => "111",
        "JP" => "119",
        "BR" => "192",
        "ZA" => "10177",
        _ => "911",
    }
}

/// Static in-process directory covering the countries the service ships
/// with. Anything else resolves to `UnknownCountry` and the caller's
/// default-context recovery.
pub struct StaticLocationDirectory;

#[async_trait]
impl LocationInfoSource for StaticLocationDirectory {
    async fn country_info(
        &self,
        country_code: &str,
        _city: Option<&str>,
    ) -> Result<CountryMedicalInfo, LocationError> {
        let code = country_code.to_uppercase();
        let info = match code.as_str() {
            "US" => CountryMedicalInfo {
                emergency_number: "911".into(),
                common_diseases: strings(&["influenza", "hypertension", "type 2 diabetes"]),
                vaccination_requirements: strings(&["Routine immunization schedule (CDC)"]),
                healthcare_system_info:
                    "Mixed private/public system; most care requires insurance.".into(),
                drug_regulations: strings(&[
                    "Opioids and benzodiazepines are Schedule II-IV controlled substances",
                    "Antibiotics require a prescription",
                ]),
                climate_considerations: strings(&["Seasonal influenza peaks in winter"]),
            },
            "GB" => CountryMedicalInfo {
                emergency_number: "999".into(),
                common_diseases: strings(&["influenza", "cardiovascular disease", "asthma"]),
                vaccination_requirements: strings(&["NHS routine immunization schedule"]),
                healthcare_system_info: "NHS provides free care at the point of use.".into(),
                drug_regulations: strings(&[
                    "Controlled drugs regulated under the Misuse of Drugs Act",
                    "Antibiotics require a prescription",
                ]),
                climate_considerations: strings(&["Low sunlight; vitamin D deficiency common"]),
            },
            "NG" => CountryMedicalInfo {
                emergency_number: "112".into(),
                common_diseases: strings(&["malaria", "typhoid", "hypertension"]),
                vaccination_requirements: strings(&[
                    "Yellow fever vaccination required",
                    "Routine NPHCDA schedule",
                ]),
                healthcare_system_info:
                    "Mixed public/private system; out-of-pocket payment is common.".into(),
                drug_regulations: strings(&[
                    "NAFDAC regulates medicines; counterfeits are a known risk",
                ]),
                climate_considerations: strings(&[
                    "Tropical climate; hydration and malaria prophylaxis matter",
                ]),
            },
            "IN" => CountryMedicalInfo {
                emergency_number: "112".into(),
                common_diseases: strings(&["dengue", "tuberculosis", "type 2 diabetes"]),
                vaccination_requirements: strings(&["Universal Immunization Programme schedule"]),
                healthcare_system_info:
                    "Large public network alongside private hospitals; quality varies.".into(),
                drug_regulations: strings(&[
                    "Schedule H drugs require a prescription",
                ]),
                climate_considerations: strings(&["Monsoon season raises vector-borne disease risk"]),
            },
            "DE" => CountryMedicalInfo {
                emergency_number: "112".into(),
                common_diseases: strings(&["cardiovascular disease", "influenza"]),
                vaccination_requirements: strings(&["STIKO recommended schedule"]),
                healthcare_system_info: "Statutory insurance covers nearly all residents.".into(),
                drug_regulations: strings(&[
                    "Most antibiotics and analgesics above OTC strength require a prescription",
                ]),
                climate_considerations: strings(&["Tick-borne encephalitis risk in the south"]),
            },
            _ => return Err(LocationError::UnknownCountry(code)),
        };
        Ok(info)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
