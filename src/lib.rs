pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod dispatcher;
pub mod gate;
pub mod session;
pub mod spinner;
pub mod typing;
pub mod webhook;
