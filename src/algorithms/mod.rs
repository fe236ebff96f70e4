//! The stages of waterfall synthesis
pub mod annotate;
pub mod colormap;
pub mod composite;
pub mod hillshade;
pub mod resample;
pub mod resolution;
