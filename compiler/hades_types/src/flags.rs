//! Type metadata flags.
//!
//! `TypeFlags` summarise what a type tree contains so passes can skip
//! rewriting types that cannot change: substitution only touches types with
//! `HAS_PARAM_REF`, instantiation only types with `HAS_GENERIC_INSTANCE`.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u8 {
        /// Contains the Error type.
        const HAS_ERROR = 1 << 0;
        /// Contains a type parameter occurrence.
        const HAS_PARAM_REF = 1 << 1;
        /// Contains an inference variable.
        const HAS_GENERIC_INSTANCE = 1 << 2;
        /// Contains a generic struct application.
        const HAS_APPLICATION = 1 << 3;

        /// Anything monomorphization must rewrite.
        const NEEDS_MONOMORPHIZATION = Self::HAS_PARAM_REF.bits()
            | Self::HAS_GENERIC_INSTANCE.bits()
            | Self::HAS_APPLICATION.bits();
    }
}

impl TypeFlags {
    #[inline]
    pub fn has_param_ref(self) -> bool {
        self.contains(TypeFlags::HAS_PARAM_REF)
    }

    #[inline]
    pub fn has_generic_instance(self) -> bool {
        self.contains(TypeFlags::HAS_GENERIC_INSTANCE)
    }

    #[inline]
    pub fn has_error(self) -> bool {
        self.contains(TypeFlags::HAS_ERROR)
    }

    /// No parameters, inference variables or applications remain.
    #[inline]
    pub fn is_concrete(self) -> bool {
        !self.intersects(TypeFlags::NEEDS_MONOMORPHIZATION)
    }
}
