//! Meeting Cost Engine library crate.
//!
//! This crate turns employee compensation into a fully-loaded
//! per-minute cost and aggregates those costs over a meeting's
//! duration: before it starts, while it runs and once it has ended.
//! The calculation modules are pure; [`tracker`] adds the live polling
//! loop and [`api`] exposes everything over HTTP.

pub mod api;
pub mod config;
pub mod cost_model;
pub mod engine;
pub mod error;
pub mod milestones;
pub mod models;
pub mod rates;
pub mod rounding;
pub mod sanitize;
pub mod tracker;
pub mod validation;
