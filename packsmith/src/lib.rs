//! Packsmith - content-addressed modpack distribution builder.
//!
//! Packsmith walks a source tree of mod/game files, classifies
//! directories against a small reserved-name policy, hashes every
//! eligible file, deduplicates identical content into a hash-bucketed
//! object store, resolves per-file URL redirects, and emits a manifest
//! of install tasks that an installer replays to bring a local game
//! instance in sync with the distribution.
//!
//! # Crate map
//!
//! - [`builder`] - tree walking, the hash-and-publish pipeline, and
//!   build configuration
//! - [`manifest`] - the distribution manifest data model
//! - [`store`] - the content-addressed object store
//! - [`hash`] - versioned content hash algorithms

pub mod builder;
pub mod hash;
pub mod manifest;
pub mod store;
