pub mod api;
pub mod assistant;
pub mod commands;
pub mod config;
pub mod handoff;
pub mod navigation;
pub mod position;
pub mod route;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;
