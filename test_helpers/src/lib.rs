//! Test helpers shared across crates.
//!
//! This crate provides the `bar`/`baz`/`qux` fixture form types used by the
//! collection tests and a wrapper around [`figment::Jail`].

pub mod figment;
pub mod fixtures;
