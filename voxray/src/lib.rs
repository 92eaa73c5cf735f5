pub mod demo;
pub mod files;
pub mod settings;
