use std::fmt;

use hades_ir::StringInterner;

use super::{FunctionType, Type};

/// `Display` adapter returned by [`Type::display`].
///
/// The rendering is stable: monomorphization builds specialized names
/// from it, so changing it changes every mangled name.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    interner: &'a StringInterner,
}

impl<'a> TypeDisplay<'a> {
    pub(super) fn new(ty: &'a Type, interner: &'a StringInterner) -> Self {
        TypeDisplay { ty, interner }
    }

    fn nested(&self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay {
            ty,
            interner: self.interner,
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, types: &'a [Type]) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.nested(ty))?;
        }
        Ok(())
    }

    fn write_function(&self, f: &mut fmt::Formatter<'_>, func: &'a FunctionType) -> fmt::Result {
        f.write_str("fn")?;
        if let Some(params) = &func.type_params {
            f.write_str("[")?;
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(self.interner.lookup(param.binder.name()))?;
            }
            f.write_str("]")?;
        }
        f.write_str("(")?;
        if let Some(receiver) = &func.receiver {
            write!(f, "this: {}", self.nested(receiver))?;
            if !func.from.is_empty() {
                f.write_str(", ")?;
            }
        }
        self.write_list(f, &func.from)?;
        write!(f, ") -> {}", self.nested(&func.to))
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Error => f.write_str("<error>"),
            Type::Void => f.write_str("Void"),
            Type::Bool => f.write_str("Bool"),
            Type::Byte => f.write_str("Byte"),
            Type::CInt => f.write_str("CInt"),
            Type::Size => f.write_str("Size"),
            Type::RawPtr { to, is_mutable } => {
                let prefix = if *is_mutable { "*mut " } else { "*" };
                write!(f, "{prefix}{}", self.nested(to))
            }
            Type::Function(func) => self.write_function(f, func),
            Type::Struct(s) => write!(f, "{}", s.constructor.name.display(self.interner)),
            Type::Constructor(c) => write!(f, "{}", c.name.display(self.interner)),
            Type::Application { callee, args } => {
                write!(f, "{}[", self.nested(callee))?;
                self.write_list(f, args)?;
                f.write_str("]")
            }
            Type::ParamRef(binder) => f.write_str(self.interner.lookup(binder.name())),
            Type::GenericInstance(instance) => {
                write!(f, "?{}{}", self.interner.lookup(instance.binder.name()), instance.id)
            }
        }
    }
}
