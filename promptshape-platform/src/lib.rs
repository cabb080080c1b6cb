pub mod appearance;
pub mod clipboard;
