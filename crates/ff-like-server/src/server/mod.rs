pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod stub;
