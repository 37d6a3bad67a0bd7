//! Live channel directory with an adaptive stream playback controller.
//!
//! - [`streaming`] classifies stream URLs by transport.
//! - [`player`] drives a video surface through the playback fallback chain.
//! - [`catalog`], [`directory`] and [`library`] back the HTTP API in [`web`].

pub mod catalog;
pub mod config;
pub mod directory;
pub mod errors;
pub mod library;
pub mod models;
pub mod player;
pub mod streaming;
pub mod web;
