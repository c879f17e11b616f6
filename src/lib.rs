// src/lib.rs

//! NOTAM search library: runway and keyword matching over cached notices.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
