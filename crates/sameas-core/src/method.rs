//! Evaluation method descriptor

use serde::Serialize;

use crate::predicates::{
    OWL_SAME_AS, PROV_HAD_PRIMARY_SOURCE, SCHEMA_VALID_FROM, SCHEMA_VALID_THROUGH,
};

pub const METHOD_ID: &str = "temporal-validity/owl-sameAs/Person";
pub const METHOD_VERSION: &str = "v1";
const IDENTIFIER_BASE: &str = "urn:sameas:method";
const EVALUATION_BASE: &str = "urn:sameas:evaluation";

/// Static description of the evaluation method shipped with this engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMeta {
    /// `<method_id>@<version>`
    pub key: String,
    pub method_id: &'static str,
    pub method_identifier: String,
    pub method_name: &'static str,
    pub method_description: &'static str,
    pub method_version: &'static str,
    pub method_release_identifier: String,
    pub evaluation_base_identifier: String,
    pub domain: &'static str,
    pub subject_types: Vec<&'static str>,
    pub assumptions: Vec<&'static str>,
    pub inputs_required: Vec<&'static str>,
    pub stability: &'static str,
}

impl MethodMeta {
    pub fn current() -> Self {
        let method_identifier = format!("{}:{}", IDENTIFIER_BASE, METHOD_ID);
        Self {
            key: format!("{}@{}", METHOD_ID, METHOD_VERSION),
            method_id: METHOD_ID,
            method_release_identifier: format!("{}/releases/{}", method_identifier, METHOD_VERSION),
            method_identifier,
            method_name: "temporal-validity owl:sameAs Person",
            method_description: "Evaluates owl:sameAs statements about people using validity \
                timing, explicit contradictions, and primary-source evidence.",
            method_version: METHOD_VERSION,
            evaluation_base_identifier: format!("{}:{}", EVALUATION_BASE, METHOD_ID),
            domain: "identity",
            subject_types: vec!["Person"],
            assumptions: vec![
                "validFrom is the real-world start of the sameAs claim's validity",
                "Observation/provenance time is separate from validFrom",
                "validThrough is optional",
                "validFrom statements are expected to cite a primary source",
            ],
            inputs_required: vec![
                OWL_SAME_AS,
                SCHEMA_VALID_FROM,
                SCHEMA_VALID_THROUGH,
                PROV_HAD_PRIMARY_SOURCE,
            ],
            stability: "experimental",
        }
    }
}
