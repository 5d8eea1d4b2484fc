//! Classification response returned by `POST /predict`
//!
//! ```json
//! {
//!   "detailed_classification": { "No DR": 80.0, "Mild": 10.0, ... },
//!   "highest_probability_class": "No DR"
//! }
//! ```
//!
//! Both fields are required. Every probability must be a JSON number.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability (0-100) assigned to one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeProbability {
    pub label: String,
    pub probability: f64,
}

/// Normalized classification response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassificationResponse {
    /// Entries in the order the server sent them
    #[serde(deserialize_with = "deserialize_probabilities")]
    pub detailed_classification: Vec<GradeProbability>,
    pub highest_probability_class: String,
}

impl ClassificationResponse {
    /// Decode a response body
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Probability for a label, if present
    pub fn probability(&self, label: &str) -> Option<f64> {
        self.detailed_classification
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.probability)
    }
}

/// Label → probability object, kept in document order
///
/// A repeated label keeps its first position and its last value.
fn deserialize_probabilities<'de, D>(deserializer: D) -> Result<Vec<GradeProbability>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProbabilityVisitor;

    impl<'de> Visitor<'de> for ProbabilityVisitor {
        type Value = Vec<GradeProbability>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object mapping grade labels to probabilities")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut entries: Vec<GradeProbability> = Vec::with_capacity(map.size_hint().unwrap_or(5));

            while let Some((label, probability)) = map.next_entry::<String, f64>()? {
                match entries.iter_mut().find(|entry| entry.label == label) {
                    Some(existing) => existing.probability = probability,
                    None => entries.push(GradeProbability { label, probability }),
                }
            }

            Ok(entries)
        }
    }

    deserializer.deserialize_map(ProbabilityVisitor)
}
