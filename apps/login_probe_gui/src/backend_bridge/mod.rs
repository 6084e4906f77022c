//! Backend bridge: command queue into the async worker and its runtime.

pub mod commands;
pub mod runtime;
