// src/core/mod.rs — Pagination and the stateful multi-page protocol

pub mod clean;
pub mod estimator;
pub mod paginator;
pub mod protocol;
pub mod session;
