//! Data Transfer Objects
//!
//! Lightweight request types handed to the construction engine by callers.

pub mod pipeline;
