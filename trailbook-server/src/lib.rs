// Library exports for trailbook-server
// This allows integration tests to exercise the server modules directly

pub mod api;
pub mod cleanup;
pub mod config;
pub mod db;
pub mod password;
pub mod state;
pub mod storage;
pub mod validation;
