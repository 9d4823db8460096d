pub mod config;
pub mod edit;
pub mod fit;
pub mod info;
