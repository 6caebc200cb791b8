//! UDDF workspace aggregator. See the [`uddf`] crate for the facade.

pub use uddf::*;
