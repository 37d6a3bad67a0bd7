//! HTTP handlers organized by domain

pub mod directory;
pub mod health;
pub mod library;
pub mod player;
