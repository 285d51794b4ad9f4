use hades_ir::{Name, StringInterner};

use crate::Type;

/// Pre-interned names of the built-in types.
///
/// Primitive names are recognised before the resolver is asked, so they
/// cannot be shadowed.
pub(crate) struct WellKnownNames {
    void: Name,
    bool: Name,
    byte: Name,
    cint: Name,
    size: Name,
}

impl WellKnownNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        WellKnownNames {
            void: interner.intern("Void"),
            bool: interner.intern("Bool"),
            byte: interner.intern("Byte"),
            cint: interner.intern("CInt"),
            size: interner.intern("Size"),
        }
    }

    pub(crate) fn primitive(&self, name: Name) -> Option<Type> {
        if name == self.void {
            Some(Type::Void)
        } else if name == self.bool {
            Some(Type::Bool)
        } else if name == self.byte {
            Some(Type::Byte)
        } else if name == self.cint {
            Some(Type::CInt)
        } else if name == self.size {
            Some(Type::Size)
        } else {
            None
        }
    }
}
