pub mod ads;
pub mod checklist;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod progress;
pub mod studio;
pub mod types;

pub use error::{LaunchError, Result};
