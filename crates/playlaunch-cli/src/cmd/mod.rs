pub mod ads;
pub mod checklist;
pub mod config;
pub mod init;
pub mod rank;
pub mod studio;
pub mod ui;
