pub mod config;
pub mod manifest;
pub mod mod_ref;
pub mod modlist;
pub mod project;
