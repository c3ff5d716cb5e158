pub mod dart_types;
pub mod plugin;
