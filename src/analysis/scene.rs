// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scene classification over detected labels
//!
//! Rules are an ordered list evaluated top-down; the first match wins. The
//! order runs from the most safety-relevant category down to the generic
//! fallback, so reordering changes the category for multi-match inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detection::Detection;

/// Scene categories, serialised as their display strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneType {
    #[serde(rename = "Urban Street / Traffic")]
    UrbanTraffic,
    #[serde(rename = "Human Activity")]
    HumanActivity,
    #[serde(rename = "Vehicle Transport")]
    VehicleTransport,
    #[serde(rename = "Object Identification")]
    ObjectIdentification,
    #[serde(rename = "Empty Scene")]
    EmptyScene,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::UrbanTraffic => "Urban Street / Traffic",
            SceneType::HumanActivity => "Human Activity",
            SceneType::VehicleTransport => "Vehicle Transport",
            SceneType::ObjectIdentification => "Object Identification",
            SceneType::EmptyScene => "Empty Scene",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one detection set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAnalysis {
    pub scene_type: SceneType,
    pub summary: String,
}

/// De-duplicated labels in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_detections(detections: &[Detection]) -> Self {
        detections.iter().map(|d| d.label.as_str()).collect()
    }

    /// Add a label; returns false if it was already present
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn contains_any<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        candidates.iter().any(|c| self.contains(c.as_ref()))
    }

    /// The first `n` distinct labels in emission order
    pub fn first(&self, n: usize) -> &[String] {
        &self.labels[..n.min(self.labels.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// Label subsets the default rules key on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneVocabulary {
    /// Label that marks a person in the scene
    pub person: String,
    /// Labels that put a pedestrian at risk when next to a person
    pub traffic_vehicles: Vec<String>,
    /// Labels that indicate goods or passenger transport
    pub transport_vehicles: Vec<String>,
}

impl Default for SceneVocabulary {
    fn default() -> Self {
        Self {
            person: "person".to_string(),
            traffic_vehicles: vec![
                "car".to_string(),
                "bicycle".to_string(),
                "motorcycle".to_string(),
            ],
            transport_vehicles: vec!["car".to_string(), "truck".to_string(), "bus".to_string()],
        }
    }
}

type Matcher = Box<dyn Fn(&LabelSet, usize) -> bool + Send + Sync>;
type SummaryFn = Box<dyn Fn(&LabelSet, usize) -> String + Send + Sync>;

/// One entry of the ordered rule list
pub struct SceneRule {
    scene_type: SceneType,
    matches: Matcher,
    summary: SummaryFn,
}

impl fmt::Debug for SceneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneRule")
            .field("scene_type", &self.scene_type)
            .finish_non_exhaustive()
    }
}

impl SceneRule {
    pub fn new<M, S>(scene_type: SceneType, matches: M, summary: S) -> Self
    where
        M: Fn(&LabelSet, usize) -> bool + Send + Sync + 'static,
        S: Fn(&LabelSet, usize) -> String + Send + Sync + 'static,
    {
        Self {
            scene_type,
            matches: Box::new(matches),
            summary: Box::new(summary),
        }
    }

    pub fn scene_type(&self) -> SceneType {
        self.scene_type
    }

    pub fn matches(&self, labels: &LabelSet, count: usize) -> bool {
        (self.matches)(labels, count)
    }

    pub fn summarize(&self, labels: &LabelSet, count: usize) -> String {
        (self.summary)(labels, count)
    }
}

pub const EMPTY_SCENE_SUMMARY: &str =
    "No significant objects detected in the current visual field. System remaining in standby.";

/// Labels quoted in the generic summary
pub const GENERIC_SUMMARY_LABELS: usize = 3;

/// Ordered rule engine mapping label sets to scene categories
#[derive(Debug)]
pub struct SceneClassifier {
    rules: Vec<SceneRule>,
}

impl Default for SceneClassifier {
    fn default() -> Self {
        Self::new(SceneVocabulary::default())
    }
}

impl SceneClassifier {
    /// Build the canonical five-rule list over the given vocabulary
    pub fn new(vocab: SceneVocabulary) -> Self {
        let SceneVocabulary {
            person,
            traffic_vehicles,
            transport_vehicles,
        } = vocab;
        let person_near_traffic = person.clone();

        let rules = vec![
            SceneRule::new(
                SceneType::UrbanTraffic,
                move |labels, _| {
                    labels.contains(&person_near_traffic) && labels.contains_any(traffic_vehicles.as_slice())
                },
                |_, count| {
                    format!(
                        "Detected {} objects. High likelihood of pedestrian activity near vehicles. Caution advised in this sector.",
                        count
                    )
                },
            ),
            SceneRule::new(
                SceneType::HumanActivity,
                move |labels, _| labels.contains(&person),
                |_, count| {
                    format!(
                        "Detected {} individuals. Primary focus on personal interactions and safety monitoring.",
                        count
                    )
                },
            ),
            SceneRule::new(
                SceneType::VehicleTransport,
                move |labels, _| labels.contains_any(transport_vehicles.as_slice()),
                |_, count| {
                    format!(
                        "Transport logistics detected. {} vehicles identified. Optimal for traffic flow analysis.",
                        count
                    )
                },
            ),
            SceneRule::new(
                SceneType::ObjectIdentification,
                |_, count| count > 0,
                |labels, count| {
                    format!(
                        "Analysis complete. {} distinct objects ({}...) identified in the current sector.",
                        count,
                        labels.first(GENERIC_SUMMARY_LABELS).join(", ")
                    )
                },
            ),
            SceneRule::new(
                SceneType::EmptyScene,
                |_, _| true,
                |_, _| EMPTY_SCENE_SUMMARY.to_string(),
            ),
        ];

        Self { rules }
    }

    /// Use a custom rule list
    ///
    /// An input no rule matches is reported as `EmptyScene`.
    pub fn from_rules(rules: Vec<SceneRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SceneRule] {
        &self.rules
    }

    /// Classify a label set; `count` is the total number of detections
    pub fn classify(&self, labels: &LabelSet, count: usize) -> SceneAnalysis {
        self.rules
            .iter()
            .find(|rule| rule.matches(labels, count))
            .map(|rule| SceneAnalysis {
                scene_type: rule.scene_type(),
                summary: rule.summarize(labels, count),
            })
            .unwrap_or_else(|| SceneAnalysis {
                scene_type: SceneType::EmptyScene,
                summary: EMPTY_SCENE_SUMMARY.to_string(),
            })
    }

    pub fn classify_detections(&self, detections: &[Detection]) -> SceneAnalysis {
        self.classify(&LabelSet::from_detections(detections), detections.len())
    }
}
