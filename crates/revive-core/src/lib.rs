pub mod compare;
pub mod config;
pub mod consts;
pub mod edit;
pub mod error;
pub mod filter;
pub mod generation;
pub mod geometry;
pub mod payload;
pub mod raster;
pub mod result;
pub mod view;
