//! crates/star_talks_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Everything here lives in the caller's session memory only; nothing is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Birth details supplied once per session and used to parameterize every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDetails {
    #[serde(default)]
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

/// The astrological tradition selected for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AstrologicalSystem {
    Western,
    Vedic,
    Chinese,
    Hellenistic,
}

impl AstrologicalSystem {
    pub const ALL: [AstrologicalSystem; 4] = [
        AstrologicalSystem::Western,
        AstrologicalSystem::Vedic,
        AstrologicalSystem::Chinese,
        AstrologicalSystem::Hellenistic,
    ];

    /// The lowercase tag used on the wire and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            AstrologicalSystem::Western => "western",
            AstrologicalSystem::Vedic => "vedic",
            AstrologicalSystem::Chinese => "chinese",
            AstrologicalSystem::Hellenistic => "hellenistic",
        }
    }

    /// Display title shown when a user picks a tradition.
    pub fn title(&self) -> &'static str {
        match self {
            AstrologicalSystem::Western => "Western Tropical",
            AstrologicalSystem::Vedic => "Vedic Sidereal",
            AstrologicalSystem::Chinese => "Chinese BaZi",
            AstrologicalSystem::Hellenistic => "Hellenistic / Ancient",
        }
    }

    /// A short paragraph on what the tradition is good for, shown when picking one.
    pub fn guidance(&self) -> &'static str {
        match self {
            AstrologicalSystem::Western => {
                "Built on the seasonal zodiac and modern psychological archetypes. \
                 Consult it to understand your inner drives, the reasons behind your choices \
                 and the cycles of personal growth that shape your character."
            }
            AstrologicalSystem::Vedic => {
                "Jyotisha follows the sidereal zodiac and times life events through the Dasha \
                 periods. Consult it for questions of karma and purpose, and for when career, \
                 marriage and health milestones are likely to arrive."
            }
            AstrologicalSystem::Chinese => {
                "The Four Pillars read the balance of the Five Elements and the twelve animals. \
                 Consult it for elemental harmony, career fit and compatibility, \
                 and for the rise and fall of your luck cycles."
            }
            AstrologicalSystem::Hellenistic => {
                "The ancient Mediterranean system of Whole Sign houses, planetary dignity and the Lots. \
                 Consult it for a plain, traditional assessment of fortune, standing \
                 and the concrete outcomes of your life path."
            }
        }
    }

    /// Whether charts in this tradition are anchored on a Lagna / Ascendant.
    pub fn uses_lagna(&self) -> bool {
        !matches!(self, AstrologicalSystem::Chinese)
    }
}

impl fmt::Display for AstrologicalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planet placed in a sign and house (western, vedic and hellenistic charts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetaryPosition {
    pub planet: String,
    // Not range-checked; whatever the upstream model returned is kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_retrograde: Option<bool>,
}

/// A body described by its element and animal (chinese charts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementalPosition {
    pub planet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_retrograde: Option<bool>,
}

/// One BaZi pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub animal: String,
    pub element: String,
}

/// The Four Pillars of Destiny. Always exactly these four slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillars {
    #[serde(rename = "Year")]
    pub year: Pillar,
    #[serde(rename = "Month")]
    pub month: Pillar,
    #[serde(rename = "Day")]
    pub day: Pillar,
    #[serde(rename = "Hour")]
    pub hour: Pillar,
}

/// Chart body shared by the house-based traditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lagna: Option<String>,
    pub positions: Vec<PlanetaryPosition>,
    pub summary: String,
    pub structural_analysis: String,
}

/// Chart body for the Chinese Four Pillars tradition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaziChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillars: Option<Pillars>,
    pub positions: Vec<ElementalPosition>,
    pub summary: String,
    pub structural_analysis: String,
}

/// A computed chart, tagged by the tradition it was requested for.
///
/// Each variant only carries the fields meaningful to its tradition, so a
/// chinese chart can never hold a Lagna and a vedic chart can never hold pillars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "lowercase")]
pub enum ChartData {
    Western(HouseChart),
    Vedic(HouseChart),
    Hellenistic(HouseChart),
    Chinese(BaziChart),
}

impl ChartData {
    pub fn system(&self) -> AstrologicalSystem {
        match self {
            ChartData::Western(_) => AstrologicalSystem::Western,
            ChartData::Vedic(_) => AstrologicalSystem::Vedic,
            ChartData::Hellenistic(_) => AstrologicalSystem::Hellenistic,
            ChartData::Chinese(_) => AstrologicalSystem::Chinese,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            ChartData::Western(c) | ChartData::Vedic(c) | ChartData::Hellenistic(c) => &c.summary,
            ChartData::Chinese(c) => &c.summary,
        }
    }

    pub fn structural_analysis(&self) -> &str {
        match self {
            ChartData::Western(c) | ChartData::Vedic(c) | ChartData::Hellenistic(c) => {
                &c.structural_analysis
            }
            ChartData::Chinese(c) => &c.structural_analysis,
        }
    }

    /// The ascendant label, if this is a house-based chart that has one.
    pub fn lagna(&self) -> Option<&str> {
        match self {
            ChartData::Western(c) | ChartData::Vedic(c) | ChartData::Hellenistic(c) => {
                c.lagna.as_deref()
            }
            ChartData::Chinese(_) => None,
        }
    }

    pub fn pillars(&self) -> Option<&Pillars> {
        match self {
            ChartData::Chinese(c) => c.pillars.as_ref(),
            _ => None,
        }
    }

    /// Number of position records, regardless of tradition.
    pub fn position_count(&self) -> usize {
        match self {
            ChartData::Western(c) | ChartData::Vedic(c) | ChartData::Hellenistic(c) => {
                c.positions.len()
            }
            ChartData::Chinese(c) => c.positions.len(),
        }
    }
}

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A single turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}
