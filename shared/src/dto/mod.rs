//! # Data Transfer Objects (DTOs)
//!
//! Deployment descriptors read from the JSON deployment file.
//!
//! - [`deployment`] - farms, pools, clusters, indexes and pricing references

pub mod deployment;

pub use deployment::*;
