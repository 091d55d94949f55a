pub mod agent;
pub mod core;
pub mod history;
pub mod intent;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
pub mod tools;
