//! Closed label sets for the four tasks.
//!
//! The underlying models emit label strings; each task's set is finite, so
//! the mapping to display glyphs is an exhaustive match over an enum rather
//! than a runtime table. A label outside the set is a model/configuration
//! mismatch and is surfaced as a typed error, never defaulted.

use serde::Serialize;
use thiserror::Error;

/// A model emitted a label string outside the task's fixed label set.
#[derive(Debug, Error)]
#[error("model returned unknown {task} label: {label:?}")]
pub struct UnknownLabel {
    pub task: &'static str,
    pub label: String,
}

/// An entity group outside the fixed 4-class set reached rendering.
#[derive(Debug, Error)]
#[error("unknown entity group: {0:?}")]
pub struct UnknownEntityType(pub String);

/// A label set for one classification task.
pub trait TaskLabel: Copy + Eq + std::fmt::Debug + Sized + Send + Sync + 'static {
    const TASK: &'static str;

    /// All members, for table-completeness checks.
    const ALL: &'static [Self];

    fn from_model_label(label: &str) -> Result<Self, UnknownLabel>;
    fn as_str(&self) -> &'static str;
    fn emoji(&self) -> &'static str;
}

/// News category (7 classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Automobile,
    Entertainment,
    Politics,
    Science,
    Sports,
    Technology,
    World,
}

impl TaskLabel for Category {
    const TASK: &'static str = "category";
    const ALL: &'static [Self] = &[
        Self::Automobile,
        Self::Entertainment,
        Self::Politics,
        Self::Science,
        Self::Sports,
        Self::Technology,
        Self::World,
    ];

    fn from_model_label(label: &str) -> Result<Self, UnknownLabel> {
        match label {
            "Automobile" => Ok(Self::Automobile),
            "Entertainment" => Ok(Self::Entertainment),
            "Politics" => Ok(Self::Politics),
            "Science" => Ok(Self::Science),
            "Sports" => Ok(Self::Sports),
            "Technology" => Ok(Self::Technology),
            "World" => Ok(Self::World),
            other => Err(UnknownLabel { task: Self::TASK, label: other.to_string() }),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Automobile => "Automobile",
            Self::Entertainment => "Entertainment",
            Self::Politics => "Politics",
            Self::Science => "Science",
            Self::Sports => "Sports",
            Self::Technology => "Technology",
            Self::World => "World",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            Self::Automobile => "🚗",
            Self::Entertainment => "🍿",
            Self::Politics => "⚖️",
            Self::Science => "🧪",
            Self::Sports => "🏀",
            Self::Technology => "💻",
            Self::World => "🌍",
        }
    }
}

/// Fake-news verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeVerdict {
    Fake,
    Real,
}

impl FakeVerdict {
    /// Whether this is the positive ("Fake") class.
    pub fn is_fake(&self) -> bool {
        matches!(self, Self::Fake)
    }
}

impl TaskLabel for FakeVerdict {
    const TASK: &'static str = "fake";
    const ALL: &'static [Self] = &[Self::Fake, Self::Real];

    fn from_model_label(label: &str) -> Result<Self, UnknownLabel> {
        match label {
            "Fake" => Ok(Self::Fake),
            "Real" => Ok(Self::Real),
            other => Err(UnknownLabel { task: Self::TASK, label: other.to_string() }),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Fake => "Fake",
            Self::Real => "Real",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            Self::Fake => "👻",
            Self::Real => "👍",
        }
    }
}

/// Clickbait verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickbaitVerdict {
    Clickbait,
    Normal,
}

impl ClickbaitVerdict {
    /// Whether this is the positive ("Clickbait") class.
    pub fn is_clickbait(&self) -> bool {
        matches!(self, Self::Clickbait)
    }
}

impl TaskLabel for ClickbaitVerdict {
    const TASK: &'static str = "clickbait";
    const ALL: &'static [Self] = &[Self::Clickbait, Self::Normal];

    fn from_model_label(label: &str) -> Result<Self, UnknownLabel> {
        match label {
            "Clickbait" => Ok(Self::Clickbait),
            "Normal" => Ok(Self::Normal),
            other => Err(UnknownLabel { task: Self::TASK, label: other.to_string() }),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Clickbait => "Clickbait",
            Self::Normal => "Normal",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            Self::Clickbait => "🎣",
            Self::Normal => "✅",
        }
    }
}

/// Entity type of a recognized named-entity span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Misc,
}

impl EntityType {
    /// Parse an aggregated entity-group label as emitted by the NER model.
    pub fn from_group(group: &str) -> Result<Self, UnknownEntityType> {
        match group {
            "PER" => Ok(Self::Person),
            "LOC" => Ok(Self::Location),
            "ORG" => Ok(Self::Organization),
            "MISC" => Ok(Self::Misc),
            other => Err(UnknownEntityType(other.to_string())),
        }
    }

    pub fn as_group(&self) -> &'static str {
        match self {
            Self::Person => "PER",
            Self::Location => "LOC",
            Self::Organization => "ORG",
            Self::Misc => "MISC",
        }
    }

    /// Fixed highlight color per type.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Person => "#b2ffff",
            Self::Location => "#ffffb2",
            Self::Organization => "#adfbaf",
            Self::Misc => "#ffb2b2",
        }
    }
}

// Serialized as the aggregated group code the UI annotates spans with.
impl Serialize for EntityType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_group())
    }
}
