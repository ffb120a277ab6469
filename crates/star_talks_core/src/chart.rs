//! crates/star_talks_core/src/chart.rs
//!
//! The chart request builder: turns birth details and a tradition into a
//! structured request, sends it upstream, and parses the reply into `ChartData`.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::domain::{AstrologicalSystem, BirthDetails, ChartData};
use crate::error::OrchestrationError;
use crate::policy::CallPolicy;
use crate::ports::{GenerativeService, StructuredRequest};
use crate::schema::{chart_response_schema, ChartRecord, CHART_SCHEMA_NAME};

/// Sentences allowed in the chart summary.
pub const SUMMARY_SENTENCES: usize = 2;

/// Paragraphs allowed in the structural analysis.
pub const MAX_ANALYSIS_PARAGRAPHS: usize = 3;

/// The calculation method the model is told to follow for each tradition.
pub fn methodology(system: AstrologicalSystem) -> &'static str {
    match system {
        AstrologicalSystem::Western => {
            "Western Tropical zodiac, Placidus houses, major Ptolemaic aspects"
        }
        AstrologicalSystem::Vedic => "Vedic Sidereal, Lahiri Ayanamsha, Vimshottari Dashas",
        AstrologicalSystem::Chinese => "Chinese BaZi, Four Pillars, Day Master, Five Elements",
        AstrologicalSystem::Hellenistic => {
            "Hellenistic, Whole Sign houses, planetary dignities and sect, Lot of Fortune"
        }
    }
}

/// What the reply should fill in for each tradition.
fn field_directive(system: AstrologicalSystem) -> &'static str {
    match system {
        AstrologicalSystem::Chinese => {
            "Fill \"pillars\" with the Year, Month, Day and Hour pillars, each with its animal and element. \
             Do not include a lagna. In \"positions\", list the Day Master and the dominant elements, \
             each with its element and animal."
        }
        AstrologicalSystem::Vedic => {
            "Fill \"lagna\" with the Lagna sign name. In \"positions\", list the Grahas \
             (Sun, Moon, Mars, Mercury, Jupiter, Venus, Saturn, Rahu, Ketu) with house 1-12 and sign. \
             For each, set isRetrograde to true or false. Do not include pillars."
        }
        AstrologicalSystem::Western | AstrologicalSystem::Hellenistic => {
            "Fill \"lagna\" with the Ascendant sign name. In \"positions\", list the planets \
             (Sun, Moon, Mercury, Venus, Mars, Jupiter, Saturn) with house 1-12 and sign. \
             For each, set isRetrograde to true or false. Do not include pillars."
        }
    }
}

/// Composes the single natural-language instruction for a chart request.
pub fn build_chart_prompt(details: &BirthDetails, system: AstrologicalSystem) -> String {
    format!(
        "Calculate a high-fidelity birth chart using {methodology} for:\n\
         Name: {name}\n\
         Date: {date}\n\
         Time: {time}\n\
         Location: {location}\n\n\
         {directive}\n\n\
         Return JSON only, matching the declared schema. Keep \"summary\" to {summary} sentences \
         and \"structuralAnalysis\" to at most {paragraphs} paragraphs.",
        methodology = methodology(system),
        name = details.name,
        date = details.date,
        time = details.time,
        location = details.location,
        directive = field_directive(system),
        summary = SUMMARY_SENTENCES,
        paragraphs = MAX_ANALYSIS_PARAGRAPHS,
    )
}

/// Builds the full structured request for a chart.
pub fn build_chart_request(details: &BirthDetails, system: AstrologicalSystem) -> StructuredRequest {
    StructuredRequest {
        prompt: build_chart_prompt(details, system),
        schema_name: CHART_SCHEMA_NAME.to_string(),
        schema: chart_response_schema(),
    }
}

/// Parses a raw reply body into a chart for `system`.
///
/// Only structure is checked, plus that `summary` and `structuralAnalysis` carry text.
/// House numbers and sign names pass through untouched.
pub fn parse_chart_reply(
    raw: &str,
    system: AstrologicalSystem,
) -> Result<ChartData, OrchestrationError> {
    if raw.trim().is_empty() {
        return Err(OrchestrationError::ChartCalculation(
            "the generative service returned an empty body".to_string(),
        ));
    }
    let record: ChartRecord = serde_json::from_str(raw).map_err(|e| {
        OrchestrationError::ChartCalculation(format!("reply is not a valid chart: {}", e))
    })?;
    let chart = record.into_chart(system);
    if chart.summary().trim().is_empty() {
        return Err(OrchestrationError::ChartCalculation(
            "reply has a blank summary".to_string(),
        ));
    }
    if chart.structural_analysis().trim().is_empty() {
        return Err(OrchestrationError::ChartCalculation(
            "reply has a blank structuralAnalysis".to_string(),
        ));
    }
    Ok(chart)
}

//=========================================================================================
// The Builder
//=========================================================================================

/// Requests charts from a `GenerativeService`.
///
/// Holds no state between calls; two identical requests are independent.
#[derive(Clone)]
pub struct ChartRequestBuilder {
    generator: Arc<dyn GenerativeService>,
    policy: CallPolicy,
}

impl ChartRequestBuilder {
    pub fn new(generator: Arc<dyn GenerativeService>, policy: CallPolicy) -> Self {
        Self { generator, policy }
    }

    /// Computes a chart. Either a complete chart or an error, never a partial one.
    pub async fn compute_chart(
        &self,
        details: &BirthDetails,
        system: AstrologicalSystem,
    ) -> Result<ChartData, OrchestrationError> {
        let start = Instant::now();
        info!("Requesting {} chart for location '{}'", system, details.location);

        let request = build_chart_request(details, system);
        let raw = self
            .policy
            .execute(|| self.generator.generate_structured(&request))
            .await
            .map_err(|e| {
                error!("Chart request for {} failed upstream: {}", system, e);
                OrchestrationError::ChartCalculation(e.to_string())
            })?;

        let chart = parse_chart_reply(&raw, system).map_err(|e| {
            error!("Chart reply for {} could not be parsed: {}", system, e);
            e
        })?;

        info!(
            "⏱️ {} chart computed in {:?} with {} positions",
            system,
            start.elapsed(),
            chart.position_count()
        );
        Ok(chart)
    }
}
