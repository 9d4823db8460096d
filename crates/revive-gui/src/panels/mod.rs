mod helpers;
pub mod menu_bar;
pub mod results;
pub mod status;
pub mod toolbar;
pub mod viewport;

pub(crate) use helpers::{enum_combo, section_header};
