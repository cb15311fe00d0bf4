use axum::extract::State;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod cli;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod manager;
pub mod persistence;
pub mod routing_utils;


/// State shared between every request handler on the server
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Axum extractor type for the shared application state
pub type AppState = State<Arc<SharedData>>;
