//! Test paths: flat, separator-joined names identifying a test in a group.

use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::DeclarationError;

/// Separator between the segments of a test name (`"buffers,map,mapAsync"`).
pub const PATH_SEPARATOR: char = ',';

/// Characters reserved for query and parameter syntax.
const RESERVED_CHARS: &[char] = &[PATH_SEPARATOR, ':', ';', '=', '*'];

/// Returns whether `segment` is a legal path segment.
///
/// Legal segments are non-empty, printable ASCII without whitespace, and
/// avoid the reserved characters `, : ; = *`.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_graphic() && !RESERVED_CHARS.contains(&c))
}

/// An ordered, non-empty sequence of validated name segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestPath {
    segments: Vec<String>,
}

impl TestPath {
    /// Split `name` on [`PATH_SEPARATOR`] and validate every segment.
    ///
    /// The joined name must also decode to itself under percent-decoding,
    /// so `a%41` and `aA` can never both name tests.
    pub fn parse(name: &str) -> Result<TestPath, DeclarationError> {
        if name.is_empty() {
            return Err(DeclarationError::EmptyPath);
        }
        let segments: Vec<String> = name.split(PATH_SEPARATOR).map(str::to_string).collect();
        if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
            return Err(DeclarationError::InvalidSegment {
                name: name.to_string(),
                segment: bad.clone(),
            });
        }
        let decoded = percent_decode_str(name).decode_utf8();
        match decoded {
            Ok(d) if d == name => Ok(TestPath { segments }),
            _ => Err(DeclarationError::NotDecodeIdempotent {
                name: name.to_string(),
            }),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The segments rejoined with [`PATH_SEPARATOR`].
    pub fn joined(&self) -> String {
        self.segments.join(&PATH_SEPARATOR.to_string())
    }

    /// Whether the joined path starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.joined().starts_with(prefix)
    }
}

impl fmt::Display for TestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
