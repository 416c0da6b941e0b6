// THEORY:
// The `knowledge_base` is the static advisory layer: a read-only mapping from
// disease identifier to agricultural guidance (display name, pathogen class,
// severity, treatment and prevention lists). It deliberately lives outside the
// core pipeline — the classifier emits a `DiseaseId`, and only the report
// assembly step consults this table.
//
// Key architectural principles:
// 1.  **Process-wide immutable state**: The table is built exactly once, on
//     first access, behind a `OnceLock`, and never mutated afterwards. Every
//     request reads the same records, so there is nothing to synchronize.
// 2.  **Lookup never fails**: A missing key falls back to the healthy record.
//     A wrong advisory is recoverable; a crashed request is not.

use crate::core_modules::disease_classifier::DiseaseId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// How damaging a diagnosis is if left untreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    None,
    Medium,
    High,
    Critical,
}

/// Treatment and prevention guidance attached to a disease record.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Recommendations {
    pub pesticides: &'static [&'static str],
    pub preventive_steps: &'static [&'static str],
    pub organic_solutions: &'static [&'static str],
}

/// One advisory record in the knowledge base.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiseaseRecord {
    pub name: &'static str,
    pub scientific_name: Option<&'static str>,
    pub pathogen: Option<&'static str>,
    pub crop: &'static str,
    pub severity: Severity,
    pub recommendations: Recommendations,
}

/// Looks up the advisory record for a diagnosis. Unknown ids resolve to the
/// healthy record rather than failing.
pub fn lookup(id: DiseaseId) -> &'static DiseaseRecord {
    let base = knowledge_base();
    base.get(&id)
        .unwrap_or_else(|| base.get(&DiseaseId::Healthy).expect("healthy record is always present"))
}

/// The full advisory table, initialized on first access.
pub fn knowledge_base() -> &'static HashMap<DiseaseId, DiseaseRecord> {
    static KNOWLEDGE_BASE: OnceLock<HashMap<DiseaseId, DiseaseRecord>> = OnceLock::new();
    KNOWLEDGE_BASE.get_or_init(build_records)
}

fn build_records() -> HashMap<DiseaseId, DiseaseRecord> {
    HashMap::from([
        (
            DiseaseId::Healthy,
            DiseaseRecord {
                name: "Healthy",
                scientific_name: None,
                pathogen: None,
                crop: "General Plant",
                severity: Severity::None,
                recommendations: Recommendations {
                    pesticides: &[],
                    preventive_steps: &[
                        "Continue regular monitoring",
                        "Maintain proper irrigation",
                        "Apply balanced fertilizers",
                    ],
                    organic_solutions: &[],
                },
            },
        ),
        (
            DiseaseId::PowderyMildew,
            DiseaseRecord {
                name: "Powdery Mildew",
                scientific_name: Some("Podosphaera xanthii / Erysiphe cichoracearum"),
                pathogen: Some("Fungal"),
                crop: "Multiple Crops",
                severity: Severity::Medium,
                recommendations: Recommendations {
                    pesticides: &[
                        "Sulfur-based fungicides",
                        "Potassium bicarbonate",
                        "Myclobutanil",
                    ],
                    preventive_steps: &[
                        "Select resistant varieties",
                        "Improve air circulation",
                        "Avoid overhead watering",
                        "Remove infected plant debris",
                    ],
                    organic_solutions: &[
                        "Milk spray (1:10 ratio)",
                        "Baking soda solution",
                        "Neem oil",
                    ],
                },
            },
        ),
        (
            DiseaseId::BacterialBlight,
            DiseaseRecord {
                name: "Bacterial Blight",
                scientific_name: Some("Xanthomonas axonopodis pv. malvacearum"),
                pathogen: Some("Bacterial"),
                crop: "Cotton / Beans",
                severity: Severity::High,
                recommendations: Recommendations {
                    pesticides: &[
                        "Copper-based bactericides (preventative)",
                        "Streptomycin (limited use)",
                    ],
                    preventive_steps: &[
                        "Use disease-free seeds",
                        "Practice crop rotation",
                        "Avoid working in wet fields",
                        "Disinfect tools regularly",
                    ],
                    organic_solutions: &[
                        "Copper soap",
                        "Biological controls (Bacillus subtilis)",
                        "Remove infected leaves immediately",
                    ],
                },
            },
        ),
        (
            DiseaseId::VerticilliumWilt,
            DiseaseRecord {
                name: "Verticillium Wilt",
                scientific_name: Some("Verticillium dahliae"),
                pathogen: Some("Soil-borne Fungal"),
                crop: "Cotton / Tomato / Potato",
                severity: Severity::High,
                recommendations: Recommendations {
                    pesticides: &["Slow recovery potential - chemicals limited"],
                    preventive_steps: &[
                        "Soil solarization",
                        "Long-term crop rotation (3-4 years)",
                        "Plant resistant varieties",
                        "Control nematode populations",
                    ],
                    organic_solutions: &[
                        "Soil amendments with compost",
                        "Bio-fungicides (Trichoderma)",
                        "Remove and destroy entire infected plants",
                    ],
                },
            },
        ),
        (
            DiseaseId::LeafRust,
            DiseaseRecord {
                name: "Leaf Rust",
                scientific_name: Some("Puccinia graminis / Puccinia triticina"),
                pathogen: Some("Fungal (Biotrophic)"),
                crop: "Cotton / Corn / Wheat",
                severity: Severity::Medium,
                recommendations: Recommendations {
                    pesticides: &["Azoxystrobin", "Propiconazole", "Mancozeb"],
                    preventive_steps: &[
                        "Plant resistant hybrids",
                        "Monitor nutrient levels (avoid excess N)",
                        "Apply fungicides at early signs",
                    ],
                    organic_solutions: &[
                        "Sulfur dust",
                        "Neem oil",
                        "Remove alternate hosts/weeds",
                    ],
                },
            },
        ),
        (
            DiseaseId::ViralInfection,
            DiseaseRecord {
                name: "Viral Mosaic / Chlorosis",
                scientific_name: None,
                pathogen: None,
                crop: "General",
                severity: Severity::High,
                recommendations: Recommendations {
                    pesticides: &[
                        "Control insect vectors (aphids/thrips)",
                        "No direct chemical cure for virus",
                    ],
                    preventive_steps: &[
                        "Use virus-free certified seeds",
                        "Control weeds",
                        "Disinfect tools",
                        "Remove infected plants immediately (roguing)",
                    ],
                    organic_solutions: &[
                        "Neem oil to repel vectors",
                        "Reflective mulches",
                        "Milk spray to prevent mechanical transmission",
                    ],
                },
            },
        ),
        (
            DiseaseId::SeptoriaLeafSpot,
            DiseaseRecord {
                name: "Septoria Leaf Spot",
                scientific_name: None,
                pathogen: None,
                crop: "Tomato / Wheat",
                severity: Severity::Medium,
                recommendations: Recommendations {
                    pesticides: &["Chlorothalonil", "Copper fungicides", "Mancozeb"],
                    preventive_steps: &[
                        "Crop rotation",
                        "Mulching to prevent soil splash",
                        "Water at base of plant",
                        "Remove lower leaves",
                    ],
                    organic_solutions: &[
                        "Copper spray",
                        "Biological fungicides",
                        "Enhanced air circulation",
                    ],
                },
            },
        ),
        (
            DiseaseId::Anthracnose,
            DiseaseRecord {
                name: "Anthracnose",
                scientific_name: Some("Colletotrichum gloeosporioides"),
                pathogen: Some("Fungal"),
                crop: "Berries / Beans",
                severity: Severity::Medium,
                recommendations: Recommendations {
                    pesticides: &["Captan", "Chlorothalonil", "Benomyl"],
                    preventive_steps: &[
                        "Use resistant varieties",
                        "Crop rotation",
                        "Proper drainage",
                        "Remove infected fruit/twigs",
                    ],
                    organic_solutions: &[
                        "Copper fungicides",
                        "Neem oil",
                        "Hot water seed treatment",
                    ],
                },
            },
        ),
        (
            DiseaseId::TomatoLeafMold,
            DiseaseRecord {
                name: "Tomato Leaf Mold",
                scientific_name: None,
                pathogen: None,
                crop: "Tomato",
                severity: Severity::Medium,
                recommendations: Recommendations {
                    pesticides: &[
                        "Chlorothalonil (Daconil)",
                        "Copper-based fungicide (Bordeaux mixture)",
                        "Mancozeb",
                    ],
                    preventive_steps: &[
                        "Improve air circulation (pruning)",
                        "Water at roots",
                        "Clean greenhouse structures",
                    ],
                    organic_solutions: &[
                        "Neem oil spray",
                        "Baking soda solution",
                        "Compost tea",
                    ],
                },
            },
        ),
        (
            DiseaseId::PotatoLateBlight,
            DiseaseRecord {
                name: "Late Blight",
                scientific_name: Some("Phytophthora infestans"),
                pathogen: Some("Oomycete (Fungal-like)"),
                crop: "Potato",
                severity: Severity::Critical,
                recommendations: Recommendations {
                    pesticides: &["Ridomil Gold", "Mancozeb", "Chlorothalonil"],
                    preventive_steps: &[
                        "Destroy culled potatoes",
                        "Plant certified seed",
                        "Monitor weather (cool/wet favors blight)",
                        "Kill vines before harvest",
                    ],
                    organic_solutions: &[
                        "Copper products",
                        "Hydrogen dioxide",
                        "Compost tea",
                    ],
                },
            },
        ),
        (
            DiseaseId::NotACrop,
            DiseaseRecord {
                name: "Not a Crop",
                scientific_name: None,
                pathogen: None,
                crop: "Unknown Object",
                severity: Severity::None,
                recommendations: Recommendations {
                    pesticides: &[],
                    preventive_steps: &[
                        "Please upload a clear image of a crop leaf",
                        "Ensure the image is well-lit",
                        "Focus on the plant tissue",
                    ],
                    organic_solutions: &[],
                },
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_disease_id_has_a_record() {
        let ids = [
            DiseaseId::Healthy,
            DiseaseId::PowderyMildew,
            DiseaseId::BacterialBlight,
            DiseaseId::VerticilliumWilt,
            DiseaseId::LeafRust,
            DiseaseId::ViralInfection,
            DiseaseId::SeptoriaLeafSpot,
            DiseaseId::Anthracnose,
            DiseaseId::TomatoLeafMold,
            DiseaseId::PotatoLateBlight,
            DiseaseId::NotACrop,
        ];
        for id in ids {
            assert!(knowledge_base().contains_key(&id), "missing record for {id}");
        }
    }

    #[test]
    fn lookup_returns_the_matching_record() {
        let record = lookup(DiseaseId::PotatoLateBlight);
        assert_eq!(record.name, "Late Blight");
        assert_eq!(record.severity, Severity::Critical);
    }

    #[test]
    fn healthy_record_carries_no_treatments() {
        let record = lookup(DiseaseId::Healthy);
        assert!(record.recommendations.pesticides.is_empty());
        assert!(!record.recommendations.preventive_steps.is_empty());
    }

    #[test]
    fn not_a_crop_record_guides_the_operator() {
        let record = lookup(DiseaseId::NotACrop);
        assert_eq!(record.crop, "Unknown Object");
        assert_eq!(record.severity, Severity::None);
    }
}
