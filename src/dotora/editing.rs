//! Editing stage
//!
//!     [`DotOraFile`] owns the parsed params and exposes the mutation API. Every
//!     mutation is idempotent: applying it a second time reports no change and leaves
//!     the rendered text identical.
//!
//!     [`request`] is the one-shot interface for callers that hold arguments rather
//!     than a file object: validate, parse, apply one edit, render.

pub mod file;
pub mod request;
pub mod selector;

pub use file::DotOraFile;
pub use request::{apply, EditOutcome, EditRequest, State};
pub use selector::AliasSelector;
