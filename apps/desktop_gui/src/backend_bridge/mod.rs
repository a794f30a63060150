//! Backend bridge: command queue types and the worker thread that talks to the API.

pub mod commands;
pub mod runtime;
