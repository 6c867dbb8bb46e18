//! Layered dotfiles installer.
//!
//! Dotfiles live in a repository as plain layer directories: a base layer
//! (`common/`) plus overlays that apply to some platforms only (`linux/`,
//! `darwin/`, vendored plugin trees, …).  An install merges the layers into
//! a staging tree, appending overlay files onto the base files they share a
//! path with, then copies the staging tree into the home directory with a
//! leading `.` on the first path segment, backing up everything it replaces.
//!
//! The public API is organised into four layers:
//!
//! - **[`resources`]**: the per-file `observe + decide + apply` primitive
//! - **[`overlay`]**: tree walks, path mapping and the multi-pass session
//! - **[`config`]**: parse `conf/layers.toml` into a layer list
//! - **[`commands`]**: top-level subcommand orchestration (`install`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod platform;
pub mod resources;
