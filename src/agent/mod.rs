pub mod instructions;
pub mod orchestrator;

pub use orchestrator::{AnswerOrchestrator, Reply, Route, TurnReport, RESET_REPLY};
