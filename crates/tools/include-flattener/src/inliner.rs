//! Recursive include resolution and inlining.

use crate::directive::SourceLine;
use crate::error::{FlattenError, Result, UnresolvedInclude};
use crate::locator::locate;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Nesting limit used when the caller does not configure one.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Settings for one top-level invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Directories searched in order for angle includes and for quoted
    /// includes that cannot be opened next to the including file.
    pub include_dirs: Vec<PathBuf>,
    /// Maximum number of files open on the include chain at once.
    pub max_depth: usize,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            include_dirs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FlattenOptions {
    pub fn with_include_dirs<P: AsRef<Path>>(dirs: impl IntoIterator<Item = P>) -> Self {
        Self {
            include_dirs: dirs.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            ..Self::default()
        }
    }
}

/// Counters gathered during a successful invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Files opened for inlining, the root included.
    pub files_inlined: usize,
    /// Lines appended to the output sink.
    pub lines_written: usize,
    /// Deepest include chain reached; the root alone is depth 1.
    pub max_depth_seen: usize,
}

/// Result of [`flatten_file`]: the invocation result plus every unresolved
/// directive that was reported along the way.
#[derive(Debug)]
pub struct FlattenOutcome {
    pub result: Result<FlattenReport>,
    pub diagnostics: Vec<UnresolvedInclude>,
}

impl FlattenOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Depth-first include inliner.
///
/// One `Flattener` can serve several invocations; each call to
/// [`Flattener::inline`] starts from a clean include stack and diagnostic list.
#[derive(Debug)]
pub struct Flattener {
    options: FlattenOptions,
    /// Canonical paths of the files currently being inlined, root first.
    stack: Vec<PathBuf>,
    diagnostics: Vec<UnresolvedInclude>,
    report: FlattenReport,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            diagnostics: Vec::new(),
            report: FlattenReport::default(),
        }
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Unresolved directives detected by the last invocation, in detection order.
    pub fn diagnostics(&self) -> &[UnresolvedInclude] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<UnresolvedInclude> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Inline `source` and everything it includes into `out`.
    ///
    /// The first directive that cannot be resolved aborts the whole call.
    /// Lines already written stay in `out`.
    pub fn inline<W: Write + ?Sized>(
        &mut self,
        source: &Path,
        out: &mut W,
    ) -> Result<FlattenReport> {
        self.stack.clear();
        self.diagnostics.clear();
        self.report = FlattenReport::default();

        tracing::debug!(
            "Flattening {} with {} include dir(s)",
            source.display(),
            self.options.include_dirs.len()
        );
        self.inline_file(source, out)?;
        Ok(self.report)
    }

    fn inline_file<W: Write + ?Sized>(&mut self, source: &Path, out: &mut W) -> Result<()> {
        let file = open_source(source)?;

        let key = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
        if self.stack.contains(&key) {
            return Err(FlattenError::IncludeCycle {
                path: source.to_path_buf(),
                chain: self.stack.clone(),
            });
        }
        if self.stack.len() >= self.options.max_depth {
            return Err(FlattenError::DepthExceeded {
                path: source.to_path_buf(),
                limit: self.options.max_depth,
            });
        }

        self.stack.push(key);
        self.report.files_inlined += 1;
        self.report.max_depth_seen = self.report.max_depth_seen.max(self.stack.len());

        let result = self.scan(source, BufReader::new(file), out);
        self.stack.pop();
        result
    }

    fn scan<R: BufRead, W: Write + ?Sized>(
        &mut self,
        source: &Path,
        reader: R,
        out: &mut W,
    ) -> Result<()> {
        // Blank lines are held back until something follows them in the same
        // file; whatever is still pending at end-of-file is dropped.
        let mut pending_blanks = 0usize;

        for (idx, chunk) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let mut raw = chunk.map_err(|e| FlattenError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }

            match SourceLine::classify(&raw) {
                SourceLine::Blank => pending_blanks += 1,
                SourceLine::Plain(text) => {
                    self.flush_blanks(out, &mut pending_blanks)?;
                    self.emit(out, text)?;
                }
                SourceLine::QuotedInclude(target) => {
                    self.flush_blanks(out, &mut pending_blanks)?;
                    self.include_quoted(source, &target, line_no, out)?;
                }
                SourceLine::AngleInclude(target) => {
                    self.flush_blanks(out, &mut pending_blanks)?;
                    tracing::debug!("{}:{}: <{}>", source.display(), line_no, target);
                    self.include_from_dirs(source, &target, line_no, out)?;
                }
            }
        }

        if pending_blanks > 0 {
            tracing::trace!(
                "Dropped {} trailing blank line(s) of {}",
                pending_blanks,
                source.display()
            );
        }
        Ok(())
    }

    fn include_quoted<W: Write + ?Sized>(
        &mut self,
        source: &Path,
        target: &str,
        line: usize,
        out: &mut W,
    ) -> Result<()> {
        let candidate = source.parent().unwrap_or_else(|| Path::new("")).join(target);
        tracing::debug!(
            "{}:{}: \"{}\" -> trying {}",
            source.display(),
            line,
            target,
            candidate.display()
        );

        match self.inline_file(&candidate, out) {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            // Any other failure of the sibling attempt, including an unresolved
            // directive deep inside it, falls back to the include directories.
            Err(e) => {
                tracing::debug!("Sibling attempt for \"{}\" failed: {}", target, e);
                self.include_from_dirs(source, target, line, out)
            }
        }
    }

    fn include_from_dirs<W: Write + ?Sized>(
        &mut self,
        source: &Path,
        target: &str,
        line: usize,
        out: &mut W,
    ) -> Result<()> {
        if let Some(name) = Path::new(target).file_name() {
            let hit = self
                .options
                .include_dirs
                .iter()
                .find_map(|dir| locate(dir, name));

            // First hit wins; a failure while inlining it is not retried
            // against later directories.
            if let Some(found) = hit {
                tracing::debug!("Resolved {} to {}", target, found.display());
                return self.inline_file(&found, out);
            }
        }
        Err(self.unresolved(source, target, line))
    }

    fn unresolved(&mut self, source: &Path, target: &str, line: usize) -> FlattenError {
        let diag = UnresolvedInclude {
            target: target.to_string(),
            file: source.to_path_buf(),
            line,
        };
        tracing::warn!("{}", diag);
        self.diagnostics.push(diag.clone());
        FlattenError::Unresolved(diag)
    }

    fn flush_blanks<W: Write + ?Sized>(&mut self, out: &mut W, pending: &mut usize) -> Result<()> {
        for _ in 0..std::mem::take(pending) {
            self.emit(out, b"")?;
        }
        Ok(())
    }

    fn emit<W: Write + ?Sized>(&mut self, out: &mut W, text: &[u8]) -> Result<()> {
        out.write_all(text)
            .and_then(|()| out.write_all(b"\n"))
            .map_err(FlattenError::Write)?;
        self.report.lines_written += 1;
        Ok(())
    }
}

fn open_source(path: &Path) -> Result<File> {
    let open_err = |source: io::Error| FlattenError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    if file.metadata().map_err(open_err)?.is_dir() {
        return Err(open_err(io::Error::from(io::ErrorKind::IsADirectory)));
    }
    Ok(file)
}

/// Open the output sink in append mode, creating it when missing.
///
/// With `truncate` the file is emptied first; the inliner itself only ever
/// appends.
pub fn open_output(path: &Path, truncate: bool) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true);
    if truncate {
        opts.write(true).truncate(true);
    } else {
        opts.append(true);
    }
    opts.open(path)
}

/// One complete top-level invocation from file to file.
///
/// The output is opened once and buffered. It is flushed whether or not the
/// invocation succeeds, so text written before a failure is kept.
pub fn flatten_file(
    root: &Path,
    output: &Path,
    options: FlattenOptions,
    truncate: bool,
) -> FlattenOutcome {
    let file = match open_output(output, truncate) {
        Ok(f) => f,
        Err(source) => {
            return FlattenOutcome {
                result: Err(FlattenError::Open {
                    path: output.to_path_buf(),
                    source,
                }),
                diagnostics: Vec::new(),
            };
        }
    };

    let mut writer = BufWriter::new(file);
    let mut flattener = Flattener::new(options);
    let mut result = flattener.inline(root, &mut writer);
    if let Err(e) = writer.flush() {
        if result.is_ok() {
            result = Err(FlattenError::Write(e));
        }
    }

    FlattenOutcome {
        result,
        diagnostics: flattener.take_diagnostics(),
    }
}
