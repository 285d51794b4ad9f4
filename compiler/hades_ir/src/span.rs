//! Source locations.
//!
//! Every AST node and every HIR node carries a [`SourceLocation`]. Locations
//! double as node identity: the checker's memo tables and the monomorphizer's
//! substitutions are keyed by them, so two nodes with identical text in
//! different places never alias.

use std::fmt;

/// Byte range within a single source file.
///
/// Layout: 8 bytes total
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for generated code.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if another span is fully contained within this span.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Identifies one source file of a program.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// A span qualified by the file it belongs to.
///
/// Ordering is by file, then by span, which is the order diagnostics are
/// emitted in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file: FileId,
    pub span: Span,
}

impl SourceLocation {
    /// Location for compiler-generated nodes with no source counterpart.
    pub const GENERATED: SourceLocation = SourceLocation {
        file: FileId(u32::MAX),
        span: Span::DUMMY,
    };

    #[inline]
    pub const fn new(file: FileId, span: Span) -> Self {
        SourceLocation { file, span }
    }

    /// Location covering both `self` and `other`.
    ///
    /// Both locations must belong to the same file.
    #[must_use]
    pub fn between(self, other: SourceLocation) -> SourceLocation {
        debug_assert_eq!(self.file, other.file, "locations span two files");
        SourceLocation {
            file: self.file,
            span: self.span.merge(other.span),
        }
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.file, self.span)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.file.0, self.span.start, self.span.end)
    }
}

/// Nodes that know where they came from.
pub trait HasLocation {
    fn location(&self) -> SourceLocation;
}

impl HasLocation for SourceLocation {
    fn location(&self) -> SourceLocation {
        *self
    }
}
