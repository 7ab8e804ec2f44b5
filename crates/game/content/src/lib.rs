//! Data-driven game descriptions and loaders.
//!
//! This crate reads declarative TOML game descriptions into `parlour-core`
//! configuration types, validating structure and filling defaults. Loaded
//! configurations are immutable inputs to the runtime; nothing here touches
//! game state.

pub mod loaders;

pub use loaders::ConfigLoader;
