pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod metadata;
pub mod mint;
