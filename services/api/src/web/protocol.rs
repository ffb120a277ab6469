//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.

use serde::{Deserialize, Serialize};
use star_talks_core::{AstrologicalSystem, BirthDetails, ChartData, ChatMessage};
use utoipa::ToSchema;

//=========================================================================================
// Payloads Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Asks for a chart in one tradition.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ChartRequestBody {
    /// `{ name, date, time, location }`, forwarded verbatim into the prompt.
    #[schema(value_type = Object)]
    pub details: BirthDetails,
    /// One of `western`, `vedic`, `chinese`, `hellenistic`.
    #[schema(value_type = String)]
    pub system: AstrologicalSystem,
}

/// Asks for the opening assessment of a freshly computed chart.
#[derive(Deserialize, Debug, ToSchema)]
pub struct OpeningRequestBody {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub chart: Option<ChartData>,
    #[schema(value_type = Object)]
    pub details: BirthDetails,
    #[schema(value_type = String)]
    pub system: AstrologicalSystem,
}

/// Asks for the next assistant turn. `history` must already end with the user's new message.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ReplyRequestBody {
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub chart: Option<ChartData>,
    #[schema(value_type = Object)]
    pub details: BirthDetails,
    #[schema(value_type = String)]
    pub system: AstrologicalSystem,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// The assistant's next turn. The client appends it to its history as a `model` message.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ReplyResponse {
    pub reply: String,
}

/// One entry of the tradition catalogue.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SystemInfo {
    #[schema(value_type = String)]
    pub system: AstrologicalSystem,
    pub title: String,
    pub methodology: String,
    /// Why someone would consult this tradition.
    pub description: String,
    /// Whether charts in this tradition carry a Lagna (otherwise they carry pillars).
    pub uses_lagna: bool,
}
