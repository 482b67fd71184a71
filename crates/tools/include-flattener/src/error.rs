use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlattenError>;

/// An include directive that neither the including file's directory nor any
/// include directory could satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedInclude {
    /// Target exactly as written between the quotes or angle brackets.
    pub target: String,
    /// File that contains the directive.
    pub file: PathBuf,
    /// 1-based line number of the directive within `file`.
    pub line: usize,
}

impl fmt::Display for UnresolvedInclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown include file {} at file {} at line {}",
            self.target,
            self.file.display(),
            self.line
        )
    }
}

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed writing flattened output: {0}")]
    Write(#[source] std::io::Error),

    #[error("{0}")]
    Unresolved(UnresolvedInclude),

    #[error("Include cycle detected: {} -> {}", chain_display(chain), path.display())]
    IncludeCycle { path: PathBuf, chain: Vec<PathBuf> },

    #[error("Include nesting exceeds {limit} levels at {}", path.display())]
    DepthExceeded { path: PathBuf, limit: usize },
}

impl FlattenError {
    /// Fatal errors abort the invocation outright. Everything else only fails
    /// the current resolution attempt, so a quoted include may still fall back
    /// to the include directories.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Write(_) | Self::IncludeCycle { .. } | Self::DepthExceeded { .. }
        )
    }

    pub fn unresolved(&self) -> Option<&UnresolvedInclude> {
        match self {
            Self::Unresolved(u) => Some(u),
            _ => None,
        }
    }
}

fn chain_display(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
