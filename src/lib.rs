#![recursion_limit = "256"]
//! Few-shot classification built from three learned parts.
//!
//! An encoder turns a handful of example rows into knowledge
//! vectors, a mixer joins their sum with each query row, and a
//! classifier scores the result. [`ml::model::Model`] glues the
//! three together and persists them as one type-tagged bundle.

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
