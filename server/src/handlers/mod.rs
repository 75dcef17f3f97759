//! Request handlers, one module per HTTP surface area.

pub mod chat;
mod common;
pub mod health;
pub mod history;
pub mod hmac;
pub mod keys;
pub mod register;
pub mod validate;

// vim: ts=4
