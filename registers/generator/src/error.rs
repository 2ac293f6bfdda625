// Licensed under the Apache-2.0 license

//! Error type shared by the model builder and the DSL reader.

/// Errors produced while building or reading a peripheral description.
///
/// Sink write failures during emission are not represented here; the
/// emitter returns the underlying [`std::io::Error`] unmodified.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested configuration cannot describe a usable peripheral.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The DSL text does not match the register-map grammar.
    #[error("parse error: {0}")]
    Parse(String),
}
