pub mod api;
pub mod commands;
pub mod html;
pub mod installer;
pub mod models;
pub mod utils;
