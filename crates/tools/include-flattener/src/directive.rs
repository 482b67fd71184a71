//! Line classification for `#include` directives.

use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

// Unicode mode is off so `\s` is ASCII whitespace and `[^"]` matches any byte;
// lines that are not valid UTF-8 still classify.
const QUOTED_PATTERN: &str = r#"(?-u)^\s*#\s*include\s*"([^"]*)"\s*$"#;
const ANGLE_PATTERN: &str = r"(?-u)^\s*#\s*include\s*<([^>]*)>\s*$";

static QUOTED: OnceLock<Regex> = OnceLock::new();
static ANGLE: OnceLock<Regex> = OnceLock::new();

/// One line of an input file, with its terminator already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine<'a> {
    /// `#include "X"`: resolved next to the including file first.
    QuotedInclude(Cow<'a, str>),
    /// `#include <X>`: resolved through the include directories only.
    AngleInclude(Cow<'a, str>),
    /// Zero-length line.
    Blank,
    /// Anything else, forwarded byte for byte.
    Plain(&'a [u8]),
}

impl<'a> SourceLine<'a> {
    /// Classify a line. The whole line must be the directive: leading and
    /// trailing whitespace is allowed, other tokens are not.
    pub fn classify(line: &'a [u8]) -> Self {
        if line.is_empty() {
            return Self::Blank;
        }
        if let Some(target) = capture(&QUOTED, QUOTED_PATTERN, line) {
            return Self::QuotedInclude(target);
        }
        if let Some(target) = capture(&ANGLE, ANGLE_PATTERN, line) {
            return Self::AngleInclude(target);
        }
        Self::Plain(line)
    }

    pub fn is_include(&self) -> bool {
        matches!(self, Self::QuotedInclude(_) | Self::AngleInclude(_))
    }
}

fn capture<'a>(cell: &OnceLock<Regex>, pattern: &str, line: &'a [u8]) -> Option<Cow<'a, str>> {
    let re = cell.get_or_init(|| compile(pattern));
    let caps = re.captures(line)?;
    caps.get(1).map(|m| String::from_utf8_lossy(m.as_bytes()))
}

#[expect(clippy::expect_used, reason = "patterns are compile-time constants")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("include directive pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> SourceLine<'static> {
        SourceLine::QuotedInclude(Cow::Owned(s.to_string()))
    }

    fn angle(s: &str) -> SourceLine<'static> {
        SourceLine::AngleInclude(Cow::Owned(s.to_string()))
    }

    #[test]
    fn plain_quoted_include() {
        assert_eq!(SourceLine::classify(b"#include \"dir1/b.h\""), quoted("dir1/b.h"));
    }

    #[test]
    fn angle_include_without_space() {
        assert_eq!(SourceLine::classify(b"#   include<dummy.txt>"), angle("dummy.txt"));
    }

    #[test]
    fn whitespace_tolerance_everywhere() {
        assert_eq!(
            SourceLine::classify(b"  \t#\t include   \"x.h\"  \t"),
            quoted("x.h")
        );
        assert_eq!(SourceLine::classify(b" # include <std1.h> "), angle("std1.h"));
    }

    #[test]
    fn trailing_tokens_make_it_plain() {
        let line = b"#include \"x.h\" // comment";
        assert_eq!(SourceLine::classify(line), SourceLine::Plain(line));
    }

    #[test]
    fn directive_after_code_is_plain() {
        let line = b"int x; #include <y.h>";
        assert_eq!(SourceLine::classify(line), SourceLine::Plain(line));
    }

    #[test]
    fn mismatched_delimiters_are_plain() {
        let line = b"#include \"x.h>";
        assert!(!SourceLine::classify(line).is_include());
        let line = b"#include <x.h\"";
        assert!(!SourceLine::classify(line).is_include());
    }

    #[test]
    fn other_directives_are_plain() {
        let line = b"#define FOO 1";
        assert_eq!(SourceLine::classify(line), SourceLine::Plain(line));
        let line = b"#includes \"x.h\"";
        // `\s*` allows zero spaces, so this is `include` followed by `s "x.h"`
        assert!(!SourceLine::classify(line).is_include());
    }

    #[test]
    fn empty_line_is_blank_but_spaces_are_plain() {
        assert_eq!(SourceLine::classify(b""), SourceLine::Blank);
        assert_eq!(SourceLine::classify(b"   "), SourceLine::Plain(b"   "));
    }

    #[test]
    fn empty_target_is_still_a_directive() {
        assert_eq!(SourceLine::classify(b"#include \"\""), quoted(""));
    }

    #[test]
    fn non_utf8_lines_classify() {
        let line: &[u8] = b"// caf\xe9";
        assert_eq!(SourceLine::classify(line), SourceLine::Plain(line));
        assert_eq!(SourceLine::classify(b"#include \"caf\xe9.h\""), quoted("caf\u{fffd}.h"));
    }
}
