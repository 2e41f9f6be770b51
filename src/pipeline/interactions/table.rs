//! Static interaction and contraindication tables. Curated, intentionally
//! small. This is not a drug database, just the pairs worth catching in a
//! post-filter.

use super::aliases::{class_of, extract_drug_mentions};
use super::types::InteractionSeverity;

/// One undirected pairwise interaction. Keys may be generic names or class
/// names.
pub struct PairInteraction {
    pub a: &'static str,
    pub b: &'static str,
    pub severity: InteractionSeverity,
    pub description: &'static str,
    pub mechanism: Option<&'static str>,
    pub recommendation: &'static str,
}

static INTERACTIONS: &[PairInteraction] = &[
    PairInteraction {
        a: "warfarin",
        b: "nsaid",
        severity: InteractionSeverity::Major,
        description: "Significantly increased risk of serious bleeding",
        mechanism: Some("Additive anticoagulant and antiplatelet effects with gastric mucosal injury"),
        recommendation: "Avoid the combination; acetaminophen is usually the safer analgesic choice",
    },
    PairInteraction {
        a: "warfarin",
        b: "acetaminophen",
        severity: InteractionSeverity::Moderate,
        description: "Sustained regular use can raise INR and bleeding risk",
        mechanism: None,
        recommendation: "Occasional doses are acceptable; monitor INR with regular use",
    },
    PairInteraction {
        a: "maoi",
        b: "ssri",
        severity: InteractionSeverity::Contraindicated,
        description: "Risk of life-threatening serotonin syndrome",
        mechanism: Some("Combined serotonergic activity"),
        recommendation: "Never combine; a washout period is required when switching between these classes",
    },
    PairInteraction {
        a: "ssri",
        b: "nsaid",
        severity: InteractionSeverity::Moderate,
        description: "Increased risk of gastrointestinal bleeding",
        mechanism: Some("SSRIs impair platelet serotonin uptake"),
        recommendation: "Prefer alternatives or add gastric protection on medical advice",
    },
    PairInteraction {
        a: "statin",
        b: "macrolide",
        severity: InteractionSeverity::Major,
        description: "Raised statin levels with risk of muscle injury (rhabdomyolysis)",
        mechanism: Some("CYP3A4 inhibition by the macrolide"),
        recommendation: "Ask the prescriber about pausing the statin or choosing azithromycin",
    },
    PairInteraction {
        a: "ace inhibitor",
        b: "spironolactone",
        severity: InteractionSeverity::Major,
        description: "Risk of dangerous potassium elevation",
        mechanism: Some("Dual suppression of potassium excretion"),
        recommendation: "Requires potassium monitoring arranged by the prescriber",
    },
    PairInteraction {
        a: "ace inhibitor",
        b: "potassium",
        severity: InteractionSeverity::Moderate,
        description: "Potassium supplements can accumulate to unsafe levels",
        mechanism: Some("Reduced renal potassium excretion"),
        recommendation: "Do not add potassium supplements without blood-level monitoring",
    },
    PairInteraction {
        a: "benzodiazepine",
        b: "opioid",
        severity: InteractionSeverity::Major,
        description: "Profound sedation and respiratory depression",
        mechanism: Some("Additive central nervous system depression"),
        recommendation: "Avoid the combination unless closely supervised by the prescriber",
    },
    PairInteraction {
        a: "methotrexate",
        b: "nsaid",
        severity: InteractionSeverity::Major,
        description: "Methotrexate accumulation and toxicity",
        mechanism: Some("NSAIDs reduce renal clearance of methotrexate"),
        recommendation: "Check with the prescriber before any NSAID use",
    },
    PairInteraction {
        a: "digoxin",
        b: "amiodarone",
        severity: InteractionSeverity::Major,
        description: "Digoxin toxicity",
        mechanism: Some("Amiodarone reduces digoxin clearance"),
        recommendation: "Digoxin dose usually needs reduction; prescriber must be involved",
    },
];

/// Undirected exact lookup on the given tokens (generic or class names).
pub fn lookup_pair(x: &str, y: &str) -> Option<&'static PairInteraction> {
    INTERACTIONS
        .iter()
        .find(|entry| (entry.a == x && entry.b == y) || (entry.a == y && entry.b == x))
}

/// Resolve an interaction between two normalized drug names: exact generic
/// match first, then class-level matches.
pub fn resolve_interaction(
    drug_a: &str,
    drug_b: &str,
) -> Option<&'static PairInteraction> {
    if let Some(hit) = lookup_pair(drug_a, drug_b) {
        return Some(hit);
    }
    let class_a = class_of(drug_a);
    let class_b = class_of(drug_b);
    if let Some(ca) = class_a {
        if let Some(hit) = lookup_pair(ca, drug_b) {
            return Some(hit);
        }
    }
    if let Some(cb) = class_b {
        if let Some(hit) = lookup_pair(drug_a, cb) {
            return Some(hit);
        }
    }
    if let (Some(ca), Some(cb)) = (class_a, class_b) {
        if let Some(hit) = lookup_pair(ca, cb) {
            return Some(hit);
        }
    }
    None
}

/// A disease-drug pairing that should never be suggested together.
pub struct DiseaseContraindication {
    pub condition: &'static str,
    pub drug: &'static str,
    pub severity: InteractionSeverity,
    pub note: &'static str,
}

static DISEASE_CONTRAINDICATIONS: &[DiseaseContraindication] = &[
    DiseaseContraindication {
        condition: "asthma",
        drug: "beta blocker",
        severity: InteractionSeverity::Major,
        note: "Non-selective beta blockers can trigger bronchospasm in asthma",
    },
    DiseaseContraindication {
        condition: "peptic ulcer",
        drug: "nsaid",
        severity: InteractionSeverity::Major,
        note: "NSAIDs can worsen or reopen gastric ulcers",
    },
    DiseaseContraindication {
        condition: "kidney disease",
        drug: "nsaid",
        severity: InteractionSeverity::Major,
        note: "NSAIDs can further reduce kidney function",
    },
    DiseaseContraindication {
        condition: "liver disease",
        drug: "acetaminophen",
        severity: InteractionSeverity::Moderate,
        note: "Impaired clearance raises acetaminophen toxicity risk",
    },
    DiseaseContraindication {
        condition: "pregnancy",
        drug: "isotretinoin",
        severity: InteractionSeverity::Contraindicated,
        note: "Isotretinoin causes severe birth defects",
    },
];

/// Scan generated text for condition + drug/class co-occurrence against the
/// contraindication table. Deliberately user-agnostic: it flags the pairing
/// wherever it appears, whether or not the condition belongs to the
/// current user.
pub fn scan_contraindications(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mentions = extract_drug_mentions(&lower);
    let mut notes = Vec::new();

    for entry in DISEASE_CONTRAINDICATIONS {
        if !lower.contains(entry.condition) {
            continue;
        }
        let drug_mentioned = mentions.iter().any(|m| {
            m == entry.drug || class_of(m).map(|c| c == entry.drug).unwrap_or(false)
        });
        if drug_mentioned {
            notes.push(format!(
                "[{}] {} with {}: {}. Discuss with a healthcare professional.",
                entry.severity.as_str().to_uppercase(),
                entry.drug,
                entry.condition,
                entry.note,
            ));
        }
    }

    notes
}
