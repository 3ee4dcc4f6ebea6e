//! Small ambient utilities: error alias and logging setup. Everything
//! specific to routing lives under [`crate::core::router`].

pub mod error;
pub mod logging;
