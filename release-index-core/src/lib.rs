#![doc = "release-index-core: core pipeline library for release-index."]

//! This crate turns a remote release directory listing into one PyPI
//! "Simple" repository per operating system. It contains the data model, the
//! listing parser, the filename classifier, the fetch-and-hash stage, the
//! index generator and the pipeline driver. Argument parsing and subscriber
//! setup live in the `release-index` binary crate.
//!
//! # Usage
//! Build a [`config::MirrorConfig`] and call [`mirror::run_mirror`], or call
//! [`mirror::mirror`] with your own [`contract::ListingSource`] and
//! [`contract::ArtifactFetcher`] implementations.

pub mod classify;
pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod listing;
pub mod mirror;
