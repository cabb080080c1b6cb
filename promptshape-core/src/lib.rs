pub mod config;
pub mod download;
pub mod error;
pub mod request;
pub mod samples;
pub mod settings;
pub mod theme;

// Keep the public surface small and intentional.
pub use config::*;
pub use download::*;
pub use error::*;
pub use request::*;
pub use samples::*;
pub use settings::*;
pub use theme::*;
