// src/triage/department.rs
// Department catalogue used by the prompt and for canonicalising replies

use once_cell::sync::Lazy;
use regex::Regex;

/// A hospital department the model is asked to choose from
#[derive(Debug, Clone, Copy)]
pub struct Department {
    pub name: &'static str,
    /// What the department handles, shown to the model
    pub scope: &'static str,
    /// Alternative spellings accepted as exact matches (lowercase)
    aliases: &'static [&'static str],
    /// Regex used to spot the department mentioned inside prose
    mention: &'static str,
}

pub const DEPARTMENTS: &[Department] = &[
    Department {
        name: "Emergency Medicine",
        scope: "Life-threatening conditions, severe trauma, acute cardiac events",
        aliases: &["emergency", "emergency room", "er", "ed", "a&e"],
        mention: r"(?i)\bemergency\b",
    },
    Department {
        name: "Cardiology",
        scope: "Heart-related issues, chest pain, palpitations, irregular heartbeat",
        aliases: &["cardiac"],
        mention: r"(?i)\bcardiology\b",
    },
    Department {
        name: "Neurology",
        scope: "Brain and nervous system issues, headaches, dizziness, seizures, stroke symptoms, difficulty walking",
        aliases: &["neurological", "neuro"],
        mention: r"(?i)\bneurology\b",
    },
    Department {
        name: "Orthopedics",
        scope: "Bone, joint, and muscle problems, fractures, sprains",
        aliases: &["orthopaedics", "orthopedic", "orthopedic surgery", "orthopaedic surgery"],
        mention: r"(?i)\borthopa?edics?\b",
    },
    Department {
        name: "Gastroenterology",
        scope: "Digestive system issues, abdominal pain, nausea, vomiting, diarrhea",
        aliases: &["gastro", "gi"],
        mention: r"(?i)\bgastroenterology\b",
    },
    Department {
        name: "Pulmonology",
        scope: "Respiratory issues, breathing difficulties, cough, asthma",
        aliases: &["pulmonary", "respiratory medicine", "pulmonary medicine"],
        mention: r"(?i)\bpulmonology\b",
    },
    Department {
        name: "Internal Medicine",
        scope: "General medical conditions, fever, fatigue, multiple symptoms",
        aliases: &["general medicine", "general internal medicine"],
        mention: r"(?i)\binternal medicine\b",
    },
    Department {
        name: "Pediatrics",
        scope: "Children and adolescents (under 18 years)",
        aliases: &["paediatrics", "pediatric", "paediatric"],
        mention: r"(?i)\bpa?ediatrics\b",
    },
    Department {
        name: "Geriatrics",
        scope: "Elderly patients (over 65 years) with complex conditions",
        aliases: &["geriatric medicine", "geriatric"],
        mention: r"(?i)\bgeriatrics\b",
    },
    Department {
        name: "Dermatology",
        scope: "Skin conditions, rashes, lesions",
        aliases: &["derm"],
        mention: r"(?i)\bdermatology\b",
    },
    Department {
        name: "Ophthalmology",
        scope: "Eye problems, vision issues",
        aliases: &["eye clinic"],
        mention: r"(?i)\bophthalmology\b",
    },
    Department {
        name: "ENT (Ear, Nose, Throat)",
        scope: "Ear, nose, throat issues, hearing problems",
        aliases: &[
            "ent",
            "ear, nose, throat",
            "ear, nose and throat",
            "ear, nose, and throat",
            "ear nose throat",
            "ear nose and throat",
            "otolaryngology",
            "otorhinolaryngology",
        ],
        mention: r"\bENT\b|(?i:\bear,? nose,? (?:and )?throat\b|\botolaryngology\b)",
    },
    Department {
        name: "Urology",
        scope: "Urinary system issues, kidney problems",
        aliases: &["urological"],
        mention: r"(?i)\burology\b",
    },
    Department {
        name: "Gynecology",
        scope: "Women's reproductive health issues",
        aliases: &[
            "gynaecology",
            "obstetrics and gynecology",
            "obstetrics & gynecology",
            "ob/gyn",
            "obgyn",
        ],
        mention: r"(?i)\bgyna?ecology\b",
    },
    Department {
        name: "Psychiatry",
        scope: "Mental health concerns, anxiety, depression",
        aliases: &["mental health", "psychiatric"],
        mention: r"(?i)\bpsychiatry\b",
    },
];

static MENTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    DEPARTMENTS
        .iter()
        .filter_map(|d| Regex::new(d.mention).ok().map(|re| (re, d.name)))
        .collect()
});

/// Map a department name (any case, common aliases, "X Department" /
/// "Department of X" wrappers) to its catalogue spelling.
pub fn canonicalize(name: &str) -> Option<&'static str> {
    let lowered = name.trim().to_lowercase();
    let core = strip_department_wrapper(&lowered);

    DEPARTMENTS
        .iter()
        .find(|d| {
            d.name.to_lowercase() == core || d.aliases.iter().any(|alias| *alias == core)
        })
        .map(|d| d.name)
}

/// Find the catalogue department mentioned earliest in `text`
pub fn find_mention(text: &str) -> Option<&'static str> {
    MENTION_PATTERNS
        .iter()
        .filter_map(|(re, name)| re.find(text).map(|m| (m.start(), *name)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, name)| name)
}

fn strip_department_wrapper(lowered: &str) -> &str {
    let s = lowered.trim();
    let s = s.strip_prefix("the ").unwrap_or(s);
    let s = s.strip_prefix("department of ").unwrap_or(s);
    let s = s
        .strip_suffix(" department")
        .or_else(|| s.strip_suffix(" dept."))
        .or_else(|| s.strip_suffix(" dept"))
        .unwrap_or(s);
    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_fifteen_departments() {
        assert_eq!(DEPARTMENTS.len(), 15);
    }

    #[test]
    fn test_all_mention_patterns_compile() {
        assert_eq!(MENTION_PATTERNS.len(), DEPARTMENTS.len());
    }

    #[test]
    fn test_canonicalize_exact_and_case() {
        assert_eq!(canonicalize("Neurology"), Some("Neurology"));
        assert_eq!(canonicalize("neurology"), Some("Neurology"));
        assert_eq!(canonicalize("  INTERNAL MEDICINE "), Some("Internal Medicine"));
    }

    #[test]
    fn test_canonicalize_aliases() {
        assert_eq!(canonicalize("ENT"), Some("ENT (Ear, Nose, Throat)"));
        assert_eq!(canonicalize("Emergency"), Some("Emergency Medicine"));
        assert_eq!(canonicalize("Orthopaedics"), Some("Orthopedics"));
        assert_eq!(canonicalize("OB/GYN"), Some("Gynecology"));
    }

    #[test]
    fn test_canonicalize_department_wrappers() {
        assert_eq!(canonicalize("Cardiology Department"), Some("Cardiology"));
        assert_eq!(canonicalize("Department of Urology"), Some("Urology"));
        assert_eq!(canonicalize("the Emergency Department"), Some("Emergency Medicine"));
    }

    #[test]
    fn test_aliases_never_carry_department_suffix() {
        for department in DEPARTMENTS {
            for alias in department.aliases {
                assert_eq!(
                    strip_department_wrapper(alias),
                    *alias,
                    "alias {alias:?} of {} is shadowed by wrapper stripping",
                    department.name
                );
            }
        }
        assert_eq!(canonicalize("Emergency Department"), Some("Emergency Medicine"));
        assert_eq!(canonicalize("emergency department"), Some("Emergency Medicine"));
    }

    #[test]
    fn test_canonicalize_unknown() {
        assert_eq!(canonicalize("Oncology"), None);
        assert_eq!(canonicalize(""), None);
    }

    #[test]
    fn test_find_mention_earliest() {
        let text = "This could be neurological, so Neurology rather than Cardiology.";
        assert_eq!(find_mention(text), Some("Neurology"));
    }

    #[test]
    fn test_find_mention_ent_is_case_sensitive() {
        assert_eq!(find_mention("refer to ENT for review"), Some("ENT (Ear, Nose, Throat)"));
        assert_eq!(find_mention("the patient went home"), None);
    }

    #[test]
    fn test_find_mention_none() {
        assert_eq!(find_mention("No specific recommendation."), None);
    }
}
