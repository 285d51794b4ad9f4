//! Type traversal traits.
//!
//! - [`TypeFolder`] rebuilds a type, with a hook per variant. Substitution,
//!   instantiation of inference variables and monomorphization's type
//!   lowering are all folders that override one or two hooks.
//! - [`TypeVisitor`] walks a type without rebuilding it.
//!
//! Both recurse through [`ensure_sufficient_stack`].

use hades_ir::ast::Binder;
use hades_stack::ensure_sufficient_stack;

use crate::{Constructor, FunctionType, GenericInstance, StructType, Type};

/// Match arm pattern for variants with no nested types.
macro_rules! type_leaf_pattern {
    () => {
        Type::Error | Type::Void | Type::Bool | Type::Byte | Type::CInt | Type::Size
    };
}

pub trait TypeFolder {
    fn fold(&mut self, ty: &Type) -> Type {
        ensure_sufficient_stack(|| match ty {
            type_leaf_pattern!() => ty.clone(),
            Type::RawPtr { to, is_mutable } => self.fold_ptr(to, *is_mutable),
            Type::Function(func) => self.fold_function(func),
            Type::Struct(s) => self.fold_struct(s),
            Type::Constructor(c) => self.fold_constructor(c),
            Type::Application { callee, args } => self.fold_application(callee, args),
            Type::ParamRef(binder) => self.fold_param_ref(*binder),
            Type::GenericInstance(instance) => self.fold_generic_instance(*instance),
        })
    }

    fn fold_ptr(&mut self, to: &Type, is_mutable: bool) -> Type {
        Type::RawPtr {
            to: Box::new(self.fold(to)),
            is_mutable,
        }
    }

    /// Folds receiver, parameters and result. Type parameters are kept.
    fn fold_function(&mut self, func: &FunctionType) -> Type {
        let receiver = func.receiver.as_ref().map(|r| self.fold(r));
        let from = func.from.iter().map(|t| self.fold(t)).collect();
        let to = self.fold(&func.to);
        Type::function(FunctionType {
            receiver,
            type_params: func.type_params.clone(),
            from,
            to,
        })
    }

    fn fold_struct(&mut self, s: &StructType) -> Type {
        let member_types = s
            .member_types
            .iter()
            .map(|(name, ty)| (*name, self.fold(ty)))
            .collect();
        Type::Struct(Box::new(StructType {
            constructor: s.constructor.clone(),
            member_types,
        }))
    }

    fn fold_constructor(&mut self, constructor: &Constructor) -> Type {
        Type::Constructor(constructor.clone())
    }

    fn fold_application(&mut self, callee: &Type, args: &[Type]) -> Type {
        let callee = Box::new(self.fold(callee));
        let args = args.iter().map(|t| self.fold(t)).collect();
        Type::Application { callee, args }
    }

    fn fold_param_ref(&mut self, binder: Binder) -> Type {
        Type::ParamRef(binder)
    }

    fn fold_generic_instance(&mut self, instance: GenericInstance) -> Type {
        Type::GenericInstance(instance)
    }
}

pub trait TypeVisitor {
    fn visit(&mut self, ty: &Type) {
        walk_type(self, ty);
    }

    fn visit_error(&mut self) {}

    fn visit_param_ref(&mut self, _binder: Binder) {}

    fn visit_generic_instance(&mut self, _instance: GenericInstance) {}

    fn visit_constructor(&mut self, _constructor: &Constructor) {}

    fn visit_application(&mut self, callee: &Type, args: &[Type]) {
        self.visit(callee);
        for arg in args {
            self.visit(arg);
        }
    }
}

/// Default traversal for [`TypeVisitor::visit`].
pub fn walk_type<V: TypeVisitor + ?Sized>(visitor: &mut V, ty: &Type) {
    ensure_sufficient_stack(|| match ty {
        Type::Error => visitor.visit_error(),
        Type::Void | Type::Bool | Type::Byte | Type::CInt | Type::Size => {}
        Type::RawPtr { to, .. } => visitor.visit(to),
        Type::Function(func) => {
            if let Some(receiver) = &func.receiver {
                visitor.visit(receiver);
            }
            for param in &func.from {
                visitor.visit(param);
            }
            visitor.visit(&func.to);
        }
        Type::Struct(s) => {
            visitor.visit_constructor(&s.constructor);
            for (_, member) in &s.member_types {
                visitor.visit(member);
            }
        }
        Type::Constructor(c) => visitor.visit_constructor(c),
        Type::Application { callee, args } => visitor.visit_application(callee, args),
        Type::ParamRef(binder) => visitor.visit_param_ref(*binder),
        Type::GenericInstance(instance) => visitor.visit_generic_instance(*instance),
    });
}
