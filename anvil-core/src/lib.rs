//! Anvil Core
//!
//! Core types shared by the Anvil pipeline construction crates.
//!
//! This crate contains:
//! - Domain types: Pipeline, Stage, Job and the seeds they are built from
//! - DTOs: raw pipeline attributes supplied by the caller

pub mod domain;
pub mod dto;
