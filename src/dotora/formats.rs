//! Output format implementations
//!
//! This module contains the ways a parsed file can be written out:
//! - `ora`: canonical dot-ora text, the format edits are written back in
//! - `treeviz`: one line per node, for inspecting a file's structure
//! - `json` / `yaml`: the serde view of the params

pub mod ora;
pub mod registry;
pub mod structured;
pub mod treeviz;

pub use ora::{render_file, render_param, render_value, FormatOptions, OraFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use structured::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
