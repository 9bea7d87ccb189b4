pub mod author;
pub mod diff;
pub mod install;
pub mod manifest;
pub mod show;
