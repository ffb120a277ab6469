//! crates/star_talks_core/src/schema.rs
//!
//! The response schema declared to the generative service, and the wire record
//! the reply is parsed into before it is folded into a typed `ChartData`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{
    AstrologicalSystem, BaziChart, ChartData, ElementalPosition, HouseChart, PlanetaryPosition,
    Pillars,
};

/// Name the chart schema is registered under.
pub const CHART_SCHEMA_NAME: &str = "chart_data";

/// Top-level fields every reply must carry, whatever the tradition.
pub const REQUIRED_CHART_FIELDS: [&str; 3] = ["positions", "summary", "structuralAnalysis"];

/// The four pillar slots, in order.
pub const PILLAR_KEYS: [&str; 4] = ["Year", "Month", "Day", "Hour"];

fn pillar_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "animal": { "type": "string" },
            "element": { "type": "string" }
        },
        "required": ["animal", "element"]
    })
}

/// Builds the system-agnostic chart schema.
///
/// It is a superset of all four traditions: `lagna` and `pillars` are both
/// declared and neither is required, since the builder cannot know in advance
/// which branch the model will fill.
pub fn chart_response_schema() -> Value {
    let mut pillar_properties = serde_json::Map::new();
    for key in PILLAR_KEYS {
        pillar_properties.insert(key.to_string(), pillar_schema());
    }

    json!({
        "type": "object",
        "properties": {
            "lagna": { "type": "string" },
            "pillars": {
                "type": "object",
                "properties": pillar_properties,
                "required": PILLAR_KEYS
            },
            "positions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "planet": { "type": "string" },
                        "house": { "type": "integer" },
                        "sign": { "type": "string" },
                        "element": { "type": "string" },
                        "animal": { "type": "string" },
                        "isRetrograde": { "type": "boolean" }
                    },
                    "required": ["planet"]
                }
            },
            "summary": { "type": "string" },
            "structuralAnalysis": { "type": "string" }
        },
        "required": REQUIRED_CHART_FIELDS
    })
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRecord {
    planet: String,
    #[serde(default)]
    house: Option<i64>,
    #[serde(default)]
    sign: Option<String>,
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    animal: Option<String>,
    #[serde(default)]
    is_retrograde: Option<bool>,
}

/// The reply exactly as the schema describes it, before it is tied to a tradition.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChartRecord {
    #[serde(default)]
    lagna: Option<String>,
    #[serde(default)]
    pillars: Option<Pillars>,
    positions: Vec<PositionRecord>,
    summary: String,
    structural_analysis: String,
}

impl ChartRecord {
    /// Folds the record into the variant of the requested system.
    /// The requested system is authoritative; the reply cannot change it.
    pub(crate) fn into_chart(self, system: AstrologicalSystem) -> ChartData {
        match system {
            AstrologicalSystem::Western => ChartData::Western(self.into_house_chart()),
            AstrologicalSystem::Vedic => ChartData::Vedic(self.into_house_chart()),
            AstrologicalSystem::Hellenistic => ChartData::Hellenistic(self.into_house_chart()),
            AstrologicalSystem::Chinese => ChartData::Chinese(self.into_bazi_chart()),
        }
    }

    // Pillars are dropped: they mean nothing to a house-based tradition.
    fn into_house_chart(self) -> HouseChart {
        HouseChart {
            lagna: self.lagna,
            positions: self
                .positions
                .into_iter()
                .map(|p| PlanetaryPosition {
                    planet: p.planet,
                    house: p.house,
                    sign: p.sign,
                    is_retrograde: p.is_retrograde,
                })
                .collect(),
            summary: self.summary,
            structural_analysis: self.structural_analysis,
        }
    }

    // The Lagna, houses and signs are dropped.
    fn into_bazi_chart(self) -> BaziChart {
        BaziChart {
            pillars: self.pillars,
            positions: self
                .positions
                .into_iter()
                .map(|p| ElementalPosition {
                    planet: p.planet,
                    element: p.element,
                    animal: p.animal,
                    is_retrograde: p.is_retrograde,
                })
                .collect(),
            summary: self.summary,
            structural_analysis: self.structural_analysis,
        }
    }
}
