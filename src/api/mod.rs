pub mod cfwidget;
pub mod curseforge;
pub mod http;
pub mod search;
