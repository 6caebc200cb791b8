pub mod cmd_convert;
pub mod cmd_dives;
pub mod cmd_field;
pub mod common;
