pub mod chart;
pub mod conversation;
pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod schema;

#[cfg(test)]
mod testing;

pub use chart::ChartRequestBuilder;
pub use conversation::{ConversationOrchestrator, HistoryWindow};
pub use domain::{
    AstrologicalSystem, BaziChart, BirthDetails, ChartData, ChatMessage, ChatRole,
    ElementalPosition, HouseChart, Pillar, Pillars, PlanetaryPosition,
};
pub use error::OrchestrationError;
pub use policy::{CallPolicy, RetryPolicy};
pub use ports::{ConversationRequest, GenerativeService, PortError, PortResult, StructuredRequest};
