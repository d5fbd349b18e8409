use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::{array, integer, object, string, string_enum, ResponseSchema};

/// Kind of learning content a step points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Video,
    Reading,
    Project,
}

impl StepType {
    pub const ALL: [StepType; 3] = [StepType::Video, StepType::Reading, StepType::Project];

    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Video => "video",
            StepType::Reading => "reading",
            StepType::Project => "project",
        }
    }

    /// The search a step of this type needs. Projects are self-contained briefs.
    pub fn resource_kind(self) -> Option<ResourceKind> {
        match self {
            StepType::Video => Some(ResourceKind::Video),
            StepType::Reading => Some(ResourceKind::Reading),
            StepType::Project => None,
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content types the resolver can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Video,
    Reading,
}

/// How the user prefers to learn. Each style maps onto exactly one step type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Reading,
    Practical,
}

impl LearningStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Reading => "reading",
            LearningStyle::Practical => "practical",
        }
    }

    pub fn step_type(self) -> StepType {
        match self {
            LearningStyle::Visual => StepType::Video,
            LearningStyle::Reading => StepType::Reading,
            LearningStyle::Practical => StepType::Project,
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step's `content` holds at each point of its life.
///
/// The model produces a plain string, which becomes `Topic`. Enrichment turns a
/// topic into `Resolved` or `NotFound`, once. Serialised in tagged form so the
/// three states stay distinguishable on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum StepContent {
    /// Search topic for video/reading steps, project brief for project steps.
    Topic(String),
    Resolved(String),
    NotFound,
}

#[cfg(test)]
impl StepContent {
    pub fn topic(text: impl Into<String>) -> Self {
        StepContent::Topic(text.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StepContent::Topic(text) | StepContent::Resolved(text) => Some(text),
            StepContent::NotFound => None,
        }
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, StepContent::Topic(_))
    }
}

impl fmt::Display for StepContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepContent::Topic(text) | StepContent::Resolved(text) => f.write_str(text),
            StepContent::NotFound => f.write_str("resource not found"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentRepr {
    Plain(String),
    Tagged(TaggedContent),
}

#[derive(Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
enum TaggedContent {
    Topic(String),
    Resolved(String),
    NotFound,
}

impl<'de> Deserialize<'de> for StepContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ContentRepr::deserialize(deserializer)? {
            ContentRepr::Plain(text) => StepContent::Topic(text),
            ContentRepr::Tagged(TaggedContent::Topic(text)) => StepContent::Topic(text),
            ContentRepr::Tagged(TaggedContent::Resolved(url)) => StepContent::Resolved(url),
            ContentRepr::Tagged(TaggedContent::NotFound) => StepContent::NotFound,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStep {
    /// 1-based position in the path.
    pub step: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: StepType,
    pub content: StepContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub path: Vec<LearningStep>,
}

impl LearningPath {
    /// Number of steps whose type matches the style.
    pub fn conforming_steps(&self, style: LearningStyle) -> usize {
        let wanted = style.step_type();
        self.path.iter().filter(|s| s.kind == wanted).count()
    }

    /// Drops steps of the wrong type and renumbers the rest from 1.
    pub fn retain_style(&mut self, style: LearningStyle) {
        let wanted = style.step_type();
        self.path.retain(|s| s.kind == wanted);
        self.renumber();
    }

    /// Rewrites step numbers to their position, 1..=n.
    pub fn renumber(&mut self) {
        for (index, step) in self.path.iter_mut().enumerate() {
            step.step = index as u32 + 1;
        }
    }
}

impl ResponseSchema for LearningPath {
    const NAME: &'static str = "LearningPath";

    fn shape() -> Value {
        let step_types: Vec<&str> = StepType::ALL.iter().map(|t| t.as_str()).collect();
        let step = object(
            "LearningStep",
            &[
                (
                    "step",
                    integer("The sequential number of the learning step, starting at 1.", 1),
                ),
                (
                    "title",
                    string("A clear and descriptive title for this learning step."),
                ),
                (
                    "type",
                    string_enum("The type of learning content.", &step_types),
                ),
                (
                    "content",
                    string(
                        "For 'video' or 'reading', a concise topic suitable for a web search. \
                         For 'project', a brief description of the project.",
                    ),
                ),
            ],
        );
        let mut shape = object(
            Self::NAME,
            &[(
                "path",
                array("The full list of structured learning steps.", step),
            )],
        );
        shape["properties"]["path"]["items"]["additionalProperties"] = json!(false);
        shape
    }

    fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("the path has no steps".to_string());
        }
        match self.path.iter().find(|s| s.step == 0) {
            Some(step) => Err(format!(
                "step numbers start at 1, got 0 for '{}'",
                step.title
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: u32, kind: StepType, content: &str) -> LearningStep {
        LearningStep {
            step: n,
            title: format!("Step {n}"),
            kind,
            content: StepContent::topic(content),
        }
    }

    #[test]
    fn test_model_output_parses_content_as_topic() {
        let json = r#"{"path": [
            {"step": 1, "title": "Basics", "type": "video", "content": "photovoltaic cells"}
        ]}"#;
        let path: LearningPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.path[0].kind, StepType::Video);
        assert_eq!(path.path[0].content, StepContent::topic("photovoltaic cells"));
    }

    #[test]
    fn test_unknown_step_type_is_rejected() {
        let json = r#"{"path": [
            {"step": 1, "title": "Basics", "type": "podcast", "content": "x"}
        ]}"#;
        assert!(serde_json::from_str::<LearningPath>(json).is_err());
    }

    #[test]
    fn test_negative_step_is_rejected() {
        let json = r#"{"path": [
            {"step": -1, "title": "Basics", "type": "video", "content": "x"}
        ]}"#;
        assert!(serde_json::from_str::<LearningPath>(json).is_err());
    }

    #[test]
    fn test_zero_step_fails_validation() {
        let path = LearningPath {
            path: vec![step(0, StepType::Video, "x")],
        };
        assert!(path.validate().is_err());
    }

    #[test]
    fn test_empty_path_fails_validation() {
        let path: LearningPath = serde_json::from_str(r#"{"path": []}"#).unwrap();
        assert!(path.validate().is_err());
    }

    #[test]
    fn test_renumber_uses_position() {
        let mut path = LearningPath {
            path: vec![
                step(3, StepType::Video, "a"),
                step(3, StepType::Video, "b"),
                step(9, StepType::Video, "c"),
            ],
        };
        path.renumber();
        let numbers: Vec<u32> = path.path.iter().map(|s| s.step).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_tagged_content_survives_a_round_trip_through_the_api() {
        let original = LearningPath {
            path: vec![
                LearningStep {
                    content: StepContent::Resolved("https://example.com".into()),
                    ..step(1, StepType::Reading, "")
                },
                LearningStep {
                    content: StepContent::NotFound,
                    ..step(2, StepType::Reading, "")
                },
                step(3, StepType::Reading, "grid storage"),
            ],
        };
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json["path"][1]["content"]["state"], "not_found");
        let back: LearningPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_not_found_renders_distinctly() {
        assert_eq!(StepContent::NotFound.to_string(), "resource not found");
        assert_eq!(StepContent::NotFound.as_str(), None);
    }

    #[test]
    fn test_style_maps_to_step_type() {
        assert_eq!(LearningStyle::Visual.step_type(), StepType::Video);
        assert_eq!(LearningStyle::Reading.step_type(), StepType::Reading);
        assert_eq!(LearningStyle::Practical.step_type(), StepType::Project);
        assert_eq!(StepType::Project.resource_kind(), None);
    }

    #[test]
    fn test_retain_style_filters_and_renumbers() {
        let mut path = LearningPath {
            path: vec![
                step(1, StepType::Video, "a"),
                step(2, StepType::Project, "b"),
                step(3, StepType::Video, "c"),
            ],
        };
        assert_eq!(path.conforming_steps(LearningStyle::Visual), 2);
        path.retain_style(LearningStyle::Visual);
        let numbers: Vec<u32> = path.path.iter().map(|s| s.step).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(path.path[1].content, StepContent::topic("c"));
    }
}
