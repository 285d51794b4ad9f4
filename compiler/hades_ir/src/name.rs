//! Interned identifiers and dotted qualified names.

use std::fmt;

use crate::StringInterner;

/// Interned string identifier.
///
/// Comparing two `Name`s is an integer comparison. Resolving one back to
/// text needs the [`StringInterner`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// A path of names such as `std.mem.Box`.
///
/// Struct types and global definitions are identified by their qualified
/// name; specializations are named by rewriting the last segment.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct QualifiedName {
    names: Vec<Name>,
}

impl QualifiedName {
    pub fn new(names: Vec<Name>) -> Self {
        QualifiedName { names }
    }

    pub fn single(name: Name) -> Self {
        QualifiedName { names: vec![name] }
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Last segment, or `None` for the empty path.
    pub fn last(&self) -> Option<Name> {
        self.names.last().copied()
    }

    /// Append one segment.
    #[must_use]
    pub fn append(&self, name: Name) -> Self {
        let mut names = self.names.clone();
        names.push(name);
        QualifiedName { names }
    }

    /// Replace the last segment with `f(last)`.
    ///
    /// An empty path is returned unchanged.
    #[must_use]
    pub fn map_last(&self, f: impl FnOnce(Name) -> Name) -> Self {
        let mut names = self.names.clone();
        if let Some(last) = names.last_mut() {
            *last = f(*last);
        }
        QualifiedName { names }
    }

    /// Render as dot-separated text.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> QualifiedNameDisplay<'a> {
        QualifiedNameDisplay {
            name: self,
            interner,
        }
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

/// `Display` adapter returned by [`QualifiedName::display`].
pub struct QualifiedNameDisplay<'a> {
    name: &'a QualifiedName,
    interner: &'a StringInterner,
}

impl fmt::Display for QualifiedNameDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.name.names.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(self.interner.lookup(*name))?;
        }
        Ok(())
    }
}
