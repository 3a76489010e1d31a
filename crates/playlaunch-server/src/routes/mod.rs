pub mod ads;
pub mod checklist;
pub mod config;
pub mod navigate;
pub mod rank;
pub mod studio;
