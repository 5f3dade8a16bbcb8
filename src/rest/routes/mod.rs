//! Route handlers for the meta API.

pub mod health;
pub mod meta;
