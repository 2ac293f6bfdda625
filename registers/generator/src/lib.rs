// Licensed under the Apache-2.0 license

//! TDC register-map generator.
//!
//! This crate builds an in-memory description of the bus-visible registers
//! and interrupt lines of a multi-channel Time-to-Digital Converter
//! peripheral, parameterized by the number of measurement channels, and
//! serializes it into the nested block DSL consumed by the external
//! register-map compiler.
//!
//! ## Usage
//!
//! ```
//! use tdc_registers_generator::{build, emit_to_string};
//!
//! // Describe a TDC with 8 measurement channels.
//! let peripheral = build(8).unwrap();
//! let dsl = emit_to_string(&peripheral);
//! assert!(dsl.starts_with("peripheral {"));
//! ```
//!
//! ## Module Organization
//!
//! - [`model`]: Data types for the peripheral description
//! - [`builder`]: Constructs the model for a given channel count
//! - [`emit`]: Serializes a model into DSL text
//! - [`parse`]: Reads DSL text back into a model

pub mod builder;
pub mod emit;
pub mod model;
pub mod parse;

mod error;

// Re-export main public API
pub use builder::build;
pub use emit::{emit, emit_to_string};
pub use error::Error;
pub use model::{Access, AccessMode, Field, FieldKind, Interrupt, Peripheral, Register, Trigger};
pub use parse::parse;
