//! Drug name normalization: brand aliases, generic names, and class
//! membership. Static tables, loaded once, read-only.

/// Brand/common name → generic name.
static DRUG_ALIASES: &[(&str, &str)] = &[
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    ("nurofen", "ibuprofen"),
    ("aleve", "naproxen"),
    ("tylenol", "acetaminophen"),
    ("paracetamol", "acetaminophen"),
    ("panadol", "acetaminophen"),
    ("coumadin", "warfarin"),
    ("glucophage", "metformin"),
    ("zestril", "lisinopril"),
    ("prinivil", "lisinopril"),
    ("zoloft", "sertraline"),
    ("prozac", "fluoxetine"),
    ("lexapro", "escitalopram"),
    ("xanax", "alprazolam"),
    ("valium", "diazepam"),
    ("ativan", "lorazepam"),
    ("lipitor", "atorvastatin"),
    ("zocor", "simvastatin"),
    ("crestor", "rosuvastatin"),
    ("lanoxin", "digoxin"),
    ("cordarone", "amiodarone"),
    ("aldactone", "spironolactone"),
];

/// Class → member generic names.
static DRUG_CLASSES: &[(&str, &[&str])] = &[
    (
        "nsaid",
        &["ibuprofen", "naproxen", "aspirin", "diclofenac", "ketorolac", "indomethacin"],
    ),
    (
        "ssri",
        &["sertraline", "fluoxetine", "paroxetine", "citalopram", "escitalopram"],
    ),
    (
        "maoi",
        &["phenelzine", "tranylcypromine", "selegiline", "isocarboxazid"],
    ),
    (
        "statin",
        &["atorvastatin", "simvastatin", "rosuvastatin", "pravastatin"],
    ),
    (
        "ace inhibitor",
        &["lisinopril", "enalapril", "ramipril", "captopril"],
    ),
    (
        "anticoagulant",
        &["warfarin", "apixaban", "rivaroxaban", "heparin", "dabigatran"],
    ),
    (
        "benzodiazepine",
        &["alprazolam", "diazepam", "lorazepam", "clonazepam"],
    ),
    (
        "opioid",
        &["oxycodone", "hydrocodone", "morphine", "fentanyl", "codeine", "tramadol"],
    ),
    (
        "macrolide",
        &["clarithromycin", "erythromycin", "azithromycin"],
    ),
    (
        "beta blocker",
        &["propranolol", "atenolol", "metoprolol", "carvedilol"],
    ),
];

/// Generics with no class grouping that the tables still reference.
static STANDALONE_GENERICS: &[&str] = &[
    "acetaminophen",
    "metformin",
    "omeprazole",
    "digoxin",
    "amiodarone",
    "spironolactone",
    "methotrexate",
    "isotretinoin",
    "potassium",
];

/// Normalize a medication name: lowercase, trimmed, alias resolved to its
/// generic.
pub fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    for (alias, generic) in DRUG_ALIASES {
        if lower == *alias {
            return generic.to_string();
        }
    }
    lower
}

/// The class a generic belongs to, if any.
pub fn class_of(generic: &str) -> Option<&'static str> {
    DRUG_CLASSES
        .iter()
        .find(|(_, members)| members.contains(&generic))
        .map(|(class, _)| *class)
}

/// All drug mentions found in free text, normalized to generic or class
/// form, deduplicated in order of first appearance.
pub fn extract_drug_mentions(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut mentions: Vec<String> = Vec::new();

    let mut push = |name: &str| {
        if !mentions.iter().any(|m| m == name) {
            mentions.push(name.to_string());
        }
    };

    for (alias, generic) in DRUG_ALIASES {
        if lower.contains(alias) {
            push(generic);
        }
    }
    for (class, members) in DRUG_CLASSES {
        if lower.contains(class) {
            push(class);
        }
        for member in *members {
            if lower.contains(member) {
                push(member);
            }
        }
    }
    for generic in STANDALONE_GENERICS {
        if lower.contains(generic) {
            push(generic);
        }
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_names_normalize_to_generic() {
        assert_eq!(normalize("Advil"), "ibuprofen");
        assert_eq!(normalize(" Coumadin "), "warfarin");
        assert_eq!(normalize("Tylenol"), "acetaminophen");
    }

    #[test]
    fn generic_names_pass_through_lowercased() {
        assert_eq!(normalize("Warfarin"), "warfarin");
        assert_eq!(normalize("unknown-drug"), "unknown-drug");
    }

    #[test]
    fn class_lookup() {
        assert_eq!(class_of("ibuprofen"), Some("nsaid"));
        assert_eq!(class_of("warfarin"), Some("anticoagulant"));
        assert_eq!(class_of("sertraline"), Some("ssri"));
        assert_eq!(class_of("metformin"), None);
    }

    #[test]
    fn extraction_finds_generics_aliases_and_classes() {
        let mentions = extract_drug_mentions(
            "For pain, ibuprofen or Aleve can help; some people prefer an NSAID-free option.",
        );
        assert!(mentions.contains(&"ibuprofen".to_string()));
        assert!(mentions.contains(&"naproxen".to_string()));
        assert!(mentions.contains(&"nsaid".to_string()));
    }

    #[test]
    fn extraction_dedupes_repeat_mentions() {
        let mentions = extract_drug_mentions("ibuprofen, more ibuprofen, and Advil");
        assert_eq!(
            mentions.iter().filter(|m| *m == "ibuprofen").count(),
            1
        );
    }

    #[test]
    fn extraction_of_plain_text_is_empty() {
        assert!(extract_drug_mentions("drink water and rest well").is_empty());
    }
}
