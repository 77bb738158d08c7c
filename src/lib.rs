//! Guesstimate
//!
//! Command-line front end over the estimation pipeline in
//! `guesstimate-core` and the tool servers in `guesstimate-tools` and
//! `guesstimate-api`.

pub mod cli;
