//! Domain types and the directory search core.

pub mod auth;
pub mod profiles;
pub mod search;
