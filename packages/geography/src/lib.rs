#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Offline place lookups.
//!
//! The [`gazetteer`] resolves postal codes and commune names to centroids
//! without any network call; [`departments`] resolves free-text
//! département names to their codes.

pub mod departments;
pub mod gazetteer;

pub use gazetteer::Gazetteer;
