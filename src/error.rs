//! The engine's closed error-kind set.

use thiserror::Error;

/// Every fallible operation in this crate returns one of these.
///
/// `Ok` is represented as `Result::Ok` rather than a variant here; `NeedData`
/// is not really an error but a protocol marker that `append_data` returns
/// while streaming input is incomplete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CssError {
    /// The allocator refused a request. The engine itself never allocates in
    /// a way that can fail under normal `std` allocation, but the variant is
    /// kept so callers embedding this engine in a no-std-adjacent or
    /// arena-allocated host have somewhere to report it.
    #[error("out of memory")]
    NoMem,

    /// A caller contract was violated (null/empty input where one is
    /// required, an operation invoked in the wrong state).
    #[error("bad parameter: {0}")]
    BadParam(&'static str),

    /// Input did not match the grammar for `property` at the current cursor.
    /// Recoverable: the declaration is dropped and parsing continues.
    #[error("invalid value for property '{property}'")]
    Invalid {
        /// The property (or construct) whose grammar rejected the input.
        property: &'static str,
    },

    /// An `@import` target could not be resolved by the host.
    #[error("import target not found: {url}")]
    FileNotFound {
        /// The URL the host could not resolve.
        url: String,
    },

    /// Streaming input is incomplete; not an error, a protocol state.
    #[error("more data needed")]
    NeedData,

    /// The byte stream declares or implies a charset the decoder cannot
    /// handle.
    #[error("unusable charset")]
    BadCharset,

    /// Unexpected end of the token vector inside a grammar production.
    #[error("unexpected end of tokens")]
    Eof,
}

/// Convenience alias used throughout the crate.
pub type CssResult<T> = Result<T, CssError>;
