//! Textual `#include` flattening.
//!
//! Given a root source file, every line of the form `#include "X"` or
//! `#include <X>` is replaced by the contents of the file it names,
//! recursively, producing one flattened stream:
//! - [`SourceLine`]: classification of a single line
//! - [`locate`]: basename lookup below an include directory
//! - [`Flattener`]: the depth-first inliner
//! - [`flatten_file`]: one complete file-to-file invocation
//!
//! # Resolution order
//! 1. Quoted includes are first opened relative to the including file's directory.
//! 2. If that fails, and always for angle includes, each include directory is
//!    walked in order for a file with the target's basename. The first hit wins.
//! 3. Nothing found: an [`UnresolvedInclude`] is recorded and the invocation fails.
//!
//! # Example
//! ```no_run
//! use include_flattener::{FlattenOptions, flatten_file};
//! use std::path::Path;
//!
//! let options = FlattenOptions::with_include_dirs(["include1", "include2"]);
//! let outcome = flatten_file(Path::new("a.cpp"), Path::new("a.in"), options, true);
//! for diag in &outcome.diagnostics {
//!     eprintln!("{diag}");
//! }
//! ```

pub mod directive;
pub mod error;
pub mod inliner;
pub mod locator;

pub use directive::SourceLine;
pub use error::{FlattenError, Result, UnresolvedInclude};
pub use inliner::{
    DEFAULT_MAX_DEPTH, FlattenOptions, FlattenOutcome, FlattenReport, Flattener, flatten_file,
    open_output,
};
pub use locator::locate;
