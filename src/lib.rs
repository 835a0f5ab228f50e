// src/lib.rs — Library root for cardpress

pub mod api;
pub mod cli;
pub mod core;
pub mod infra;
pub mod macros;
pub mod provider;
pub mod render;
pub mod util;
