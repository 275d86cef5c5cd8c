//! Core pipeline orchestration and domain logic for ResumeForge.
//!
//! This crate ties together the project store, subset enumeration, template
//! rendering, and compiler invocation into end-to-end workflows
//! (`run_build`, `plan_build`).

pub mod enumerate;
pub mod manifest;
pub mod pipeline;
