pub mod alerts;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod haptic;
pub mod interpreter;
pub mod model;
pub mod panel;
pub mod parser;
pub mod telemetry;
