pub mod board;
pub mod config;
pub mod controller;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod startup;
pub mod view;

use crate::{controller::BoardHandle, view::PageRenderer};
use std::time::Duration;

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub board: BoardHandle,
    pub pages: PageRenderer,
    pub settle_timeout: Duration,
}
