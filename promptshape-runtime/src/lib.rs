pub mod backend;
pub mod bootstrap;
pub mod config_store;
pub mod defaults;
pub mod downloads;
pub mod fs_util;
pub mod prefs_store;
