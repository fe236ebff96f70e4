//! Readers for sonar data formats
pub mod all;
