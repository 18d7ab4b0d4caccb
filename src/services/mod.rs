// src/services/mod.rs
pub mod webhook;
