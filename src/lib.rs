// src/lib.rs
pub mod config;
pub mod health;
pub mod statuspage;
pub mod tracking;
