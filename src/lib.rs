#![warn(missing_docs)]
//! A toolkit for rendering multibeam sonar data as hill-shaded waterfalls
//!
//! A file is read twice. The first pass estimates how far apart beams
//! and pings are; the second lays every ping on a regular grid and
//! stretches it so both axes share a scale. The grid is then shaded,
//! colored by depth and labeled with times from the navigation.
pub mod algorithms;
#[allow(missing_docs)]
pub mod cli;
pub mod error;
pub mod geodesy;
pub mod model;
pub mod palette;
pub mod parser;
pub mod source;
pub mod waterfall;

pub use error::{Error, Result};
