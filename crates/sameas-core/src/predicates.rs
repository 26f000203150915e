//! Well-known predicates recognized by raw identifier.
//!
//! Injected into the resolver and the metric evaluators as an immutable value
//! so a policy revision can swap vocabularies without touching the scoring code.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::statement::predicate_id;

pub const OWL_SAME_AS: &str = "https://www.w3.org/2002/07/owl#sameAs";
pub const OWL_DIFFERENT_FROM: &str = "https://www.w3.org/2002/07/owl#differentFrom";
pub const SCHEMA_VALID_FROM: &str = "https://schema.org/validFrom";
pub const SCHEMA_VALID_THROUGH: &str = "https://schema.org/validThrough";
pub const SCHEMA_NAME: &str = "https://schema.org/name";
pub const SCHEMA_WORKS_FOR: &str = "https://schema.org/worksFor";
pub const SCHEMA_MEMBER_OF: &str = "https://schema.org/memberOf";
pub const SCHEMA_AFFILIATION: &str = "https://schema.org/affiliation";
pub const PROV_HAD_PRIMARY_SOURCE: &str = "https://www.w3.org/ns/prov#hadPrimarySource";

/// The predicate vocabulary used by one evaluation method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSet {
    /// Equivalence claim under evaluation
    pub equivalence: String,
    pub valid_from: String,
    pub valid_through: String,
    /// Citation linking a statement to its primary source
    pub primary_source: String,
    /// Explicit assertion that two entities differ
    pub different_from: String,
    pub name: String,
    pub affiliations: Vec<String>,
}

impl Default for PredicateSet {
    fn default() -> Self {
        Self {
            equivalence: OWL_SAME_AS.to_string(),
            valid_from: SCHEMA_VALID_FROM.to_string(),
            valid_through: SCHEMA_VALID_THROUGH.to_string(),
            primary_source: PROV_HAD_PRIMARY_SOURCE.to_string(),
            different_from: OWL_DIFFERENT_FROM.to_string(),
            name: SCHEMA_NAME.to_string(),
            affiliations: vec![
                SCHEMA_WORKS_FOR.to_string(),
                SCHEMA_MEMBER_OF.to_string(),
                SCHEMA_AFFILIATION.to_string(),
            ],
        }
    }
}

impl PredicateSet {
    pub fn is_affiliation(&self, predicate_raw: &str) -> bool {
        self.affiliations.iter().any(|p| p == predicate_raw)
    }

    /// Map from minted predicate id back to its raw URI, for batches whose
    /// records omit the raw predicate.
    pub fn known_predicate_ids(&self) -> AHashMap<String, String> {
        let mut raws: Vec<&str> = vec![
            &self.equivalence,
            &self.valid_from,
            &self.valid_through,
            &self.primary_source,
            &self.different_from,
            &self.name,
        ];
        raws.extend(self.affiliations.iter().map(String::as_str));

        raws.into_iter()
            .map(|raw| (predicate_id(raw), raw.to_string()))
            .collect()
    }
}
