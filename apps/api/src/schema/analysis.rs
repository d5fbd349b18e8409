use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{array, object, string, ResponseSchema};

/// Version of the `DomainAnalysis` contract. Version 2 made the overview and
/// outlook ordered bullet lists instead of free prose.
pub const ANALYSIS_SCHEMA_VERSION: u32 = 2;

/// A job role the model expects to grow within a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergingRole {
    pub title: String,
    pub description: String,
    /// May be empty, but must be present.
    pub required_skills: Vec<String>,
}

/// Forecast for a career domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub domain_overview: Vec<String>,
    pub future_outlook_summary: Vec<String>,
    pub growth_areas: Vec<String>,
    pub emerging_roles: Vec<EmergingRole>,
}

impl DomainAnalysis {
    /// The role the learning path is built for. The first-listed role is the primary one.
    pub fn primary_role(&self) -> Option<&EmergingRole> {
        self.emerging_roles.first()
    }
}

impl EmergingRole {
    fn shape() -> Value {
        object(
            "EmergingRole",
            &[
                ("title", string("The title of the emerging job role.")),
                (
                    "description",
                    string("What this role involves and why it's emerging."),
                ),
                (
                    "required_skills",
                    array(
                        "A list of key skills needed for this role.",
                        json!({ "type": "string" }),
                    ),
                ),
            ],
        )
    }
}

impl ResponseSchema for DomainAnalysis {
    const NAME: &'static str = "DomainAnalysis";

    fn shape() -> Value {
        let mut shape = object(
            Self::NAME,
            &[
                (
                    "domain_overview",
                    array(
                        "Bullet points giving a concise, engaging summary of what this domain is about.",
                        json!({ "type": "string" }),
                    ),
                ),
                (
                    "future_outlook_summary",
                    array(
                        "Bullet points projecting this domain 5-10 years ahead, highlighting key trends and disruptions.",
                        json!({ "type": "string" }),
                    ),
                ),
                (
                    "growth_areas",
                    array(
                        "A list of specific areas projected to see significant growth.",
                        json!({ "type": "string" }),
                    ),
                ),
                (
                    "emerging_roles",
                    array(
                        "A list of new and emerging job roles in this domain.",
                        EmergingRole::shape(),
                    ),
                ),
            ],
        );
        shape["version"] = json!(ANALYSIS_SCHEMA_VERSION);
        shape
    }
}
