//! Textual dump of HIR, for tracing output and tests.
//!
//! ```text
//! fn main.identity[T](x: T): T {
//!   block$0:
//!     let mut tmp$1: T
//!     *tmp$1 = x
//!     load$2 = *tmp$1
//!     return load$2
//! }
//! ```

use std::fmt::{self, Write};

use hades_ir::{Name, QualifiedName, StringInterner};
use hades_types::Type;

use crate::{
    HirBlock, HirConstant, HirDefinition, HirExprKind, HirExpression, HirModule, HirStatement,
    HirStatementKind, HirTypeParam,
};

const INDENT: &str = "  ";

impl HirModule {
    /// `Display` adapter for this module.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> HirModuleDisplay<'a> {
        HirModuleDisplay {
            module: self,
            interner,
        }
    }

    pub fn pretty_print(&self, interner: &StringInterner) -> String {
        self.display(interner).to_string()
    }
}

pub struct HirModuleDisplay<'a> {
    module: &'a HirModule,
    interner: &'a StringInterner,
}

impl fmt::Display for HirModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            out: f,
            interner: self.interner,
        };
        for definition in self.module.definitions() {
            printer.definition(definition)?;
        }
        Ok(())
    }
}

struct Printer<'a, W> {
    out: W,
    interner: &'a StringInterner,
}

impl<W: Write> Printer<'_, W> {
    fn qualified(&mut self, name: &QualifiedName) -> fmt::Result {
        write!(self.out, "{}", name.display(self.interner))
    }

    fn ty(&mut self, ty: &Type) -> fmt::Result {
        write!(self.out, "{}", ty.display(self.interner))
    }

    fn types(&mut self, types: &[Type]) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.ty(ty)?;
        }
        Ok(())
    }

    fn type_params(&mut self, params: Option<&[HirTypeParam]>) -> fmt::Result {
        let Some(params) = params else {
            return Ok(());
        };
        self.out.write_char('[')?;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.out.write_str(self.interner.lookup(param.name))?;
        }
        self.out.write_char(']')
    }

    fn definition(&mut self, definition: &HirDefinition) -> fmt::Result {
        match definition {
            HirDefinition::Function(def) => {
                let signature = &def.signature;
                self.out.write_str("fn ")?;
                if let Some(receiver) = &signature.receiver_type {
                    self.out.write_char('(')?;
                    self.ty(receiver)?;
                    self.out.write_str(").")?;
                }
                self.qualified(&signature.name)?;
                self.type_params(signature.type_params.as_deref())?;
                self.out.write_char('(')?;
                for (i, param) in signature.params.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    write!(self.out, "{}: ", self.interner.lookup(param.name))?;
                    self.ty(&param.ty)?;
                }
                self.out.write_str("): ")?;
                self.ty(&signature.return_type)?;
                self.out.write_str(" {\n")?;
                self.block(&def.body, 1)?;
                self.out.write_str("}\n")
            }
            HirDefinition::Struct(def) => {
                self.out.write_str("struct ")?;
                self.qualified(&def.name)?;
                self.type_params(def.type_params.as_deref())?;
                self.out.write_str(" {")?;
                for (i, (name, ty)) in def.fields.iter().enumerate() {
                    self.out.write_str(if i > 0 { ", " } else { " " })?;
                    write!(self.out, "{}: ", self.interner.lookup(*name))?;
                    self.ty(ty)?;
                }
                self.out.write_str(" }\n")
            }
            HirDefinition::ExternFunction(def) => {
                self.out.write_str("extern fn ")?;
                self.qualified(&def.name)?;
                self.out.write_char('(')?;
                self.types(&def.params)?;
                self.out.write_str("): ")?;
                self.ty(&def.return_type)?;
                writeln!(self.out, " = \"{}\"", self.interner.lookup(def.extern_name))
            }
            HirDefinition::Const(def) => {
                self.out.write_str("const ")?;
                self.qualified(&def.name)?;
                self.out.write_str(": ")?;
                self.ty(&def.initializer.ty)?;
                self.out.write_str(" = ")?;
                self.expression(&def.initializer)?;
                self.out.write_char('\n')
            }
        }
    }

    fn indent(&mut self, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    fn block(&mut self, block: &HirBlock, depth: usize) -> fmt::Result {
        self.indent(depth)?;
        writeln!(self.out, "{}:", self.interner.lookup(block.name))?;
        for statement in &block.statements {
            self.statement(statement, depth + 1)?;
        }
        Ok(())
    }

    fn binding(&mut self, name: Name) -> fmt::Result {
        write!(self.out, "{} = ", self.interner.lookup(name))
    }

    fn arguments(&mut self, args: &[HirExpression]) -> fmt::Result {
        self.out.write_char('(')?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.expression(arg)?;
        }
        self.out.write_char(')')
    }

    fn statement(&mut self, statement: &HirStatement, depth: usize) -> fmt::Result {
        self.indent(depth)?;
        match &statement.kind {
            HirStatementKind::Alloca {
                name,
                is_mutable,
                ty,
            } => {
                let keyword = if *is_mutable { "let mut" } else { "let" };
                write!(self.out, "{keyword} {}: ", self.interner.lookup(*name))?;
                self.ty(ty)?;
            }
            HirStatementKind::Store { ptr, value } => {
                self.out.write_char('*')?;
                self.expression(ptr)?;
                self.out.write_str(" = ")?;
                self.expression(value)?;
            }
            HirStatementKind::Load { name, ptr } => {
                self.binding(*name)?;
                self.out.write_char('*')?;
                self.expression(ptr)?;
            }
            HirStatementKind::Move { name, value } => {
                self.binding(*name)?;
                self.expression(value)?;
            }
            HirStatementKind::Call {
                name,
                callee,
                args,
                type_args,
                ..
            } => {
                self.binding(*name)?;
                self.expression(callee)?;
                if let Some(type_args) = type_args {
                    self.out.write_char('[')?;
                    self.types(type_args)?;
                    self.out.write_char(']')?;
                }
                self.arguments(args)?;
            }
            HirStatementKind::AllocateClosure {
                name,
                function,
                ctx_ptr,
                ..
            } => {
                self.binding(*name)?;
                self.out.write_str("closure")?;
                self.arguments(std::slice::from_ref(function))?;
                self.out.write_str(" with ")?;
                self.expression(ctx_ptr)?;
            }
            HirStatementKind::InvokeClosure {
                name,
                closure,
                args,
                ..
            } => {
                self.binding(*name)?;
                self.out.write_str("invoke ")?;
                self.expression(closure)?;
                self.arguments(args)?;
            }
            HirStatementKind::GetStructField {
                name, lhs, field, ..
            } => {
                self.binding(*name)?;
                self.expression(lhs)?;
                write!(self.out, ".{}", self.interner.lookup(*field))?;
            }
            HirStatementKind::GetStructFieldPointer {
                name, lhs, field, ..
            } => {
                self.binding(*name)?;
                self.out.write_char('&')?;
                self.expression(lhs)?;
                write!(self.out, "->{}", self.interner.lookup(*field))?;
            }
            HirStatementKind::Memcpy {
                destination,
                source,
                bytes,
            } => {
                self.out.write_str("memcpy ")?;
                self.expression(destination)?;
                self.out.write_str(" <- ")?;
                self.expression(source)?;
                self.out.write_str(", ")?;
                self.expression(bytes)?;
            }
            HirStatementKind::IntegerConvert { name, ty, value } => {
                self.binding(*name)?;
                self.expression(value)?;
                self.out.write_str(" as ")?;
                self.ty(ty)?;
            }
            HirStatementKind::PointerCast {
                name,
                to_pointer_of_type,
                value,
            } => {
                self.binding(*name)?;
                self.expression(value)?;
                self.out.write_str(" as *")?;
                self.ty(to_pointer_of_type)?;
            }
            HirStatementKind::Not { name, expression } => {
                self.binding(*name)?;
                self.out.write_str("not ")?;
                self.expression(expression)?;
            }
            HirStatementKind::BinOp {
                name,
                lhs,
                operator,
                rhs,
                ..
            } => {
                self.binding(*name)?;
                self.expression(lhs)?;
                write!(self.out, " {operator} ")?;
                self.expression(rhs)?;
            }
            HirStatementKind::TypeApplication {
                name,
                expression,
                args,
                ..
            } => {
                self.binding(*name)?;
                self.expression(expression)?;
                self.out.write_char('[')?;
                self.types(args)?;
                self.out.write_char(']')?;
            }
            HirStatementKind::Return(value) => {
                self.out.write_str("return ")?;
                self.expression(value)?;
            }
            HirStatementKind::Jump(target) => {
                write!(self.out, "jump {}", self.interner.lookup(*target))?;
            }
            HirStatementKind::SwitchInt {
                condition,
                on_true,
                on_false,
            } => {
                self.out.write_str("switch ")?;
                self.expression(condition)?;
                self.out.write_char('\n')?;
                self.block(on_true, depth + 1)?;
                return self.block(on_false, depth + 1);
            }
            HirStatementKind::MatchInt {
                value,
                arms,
                otherwise,
            } => {
                self.out.write_str("match ")?;
                self.expression(value)?;
                self.out.write_char('\n')?;
                for arm in arms {
                    self.indent(depth + 1)?;
                    writeln!(self.out, "{} =>", arm.value)?;
                    self.block(&arm.block, depth + 2)?;
                }
                self.indent(depth + 1)?;
                self.out.write_str("_ =>\n")?;
                return self.block(otherwise, depth + 2);
            }
            HirStatementKind::While {
                condition_name,
                condition_block,
                body,
            } => {
                writeln!(self.out, "while {}", self.interner.lookup(*condition_name))?;
                self.block(condition_block, depth + 1)?;
                return self.block(body, depth + 1);
            }
        }
        self.out.write_char('\n')
    }

    fn expression(&mut self, expression: &HirExpression) -> fmt::Result {
        match &expression.kind {
            HirExprKind::GlobalRef(name) => self.qualified(name),
            HirExprKind::ParamRef(name) | HirExprKind::LocalRef(name) => {
                self.out.write_str(self.interner.lookup(*name))
            }
            HirExprKind::TraitMethodRef {
                trait_name,
                trait_args,
                method,
            } => {
                self.qualified(trait_name)?;
                self.out.write_char('[')?;
                self.types(trait_args)?;
                write!(self.out, "].{}", self.interner.lookup(*method))
            }
            HirExprKind::Constant(constant) => match constant {
                HirConstant::Int(value) => write!(self.out, "{value}"),
                HirConstant::Bool(value) => write!(self.out, "{value}"),
                HirConstant::ByteString(bytes) => {
                    write!(self.out, "b\"{}\"", bytes.escape_ascii())
                }
                HirConstant::NullPtr => self.out.write_str("null"),
                HirConstant::SizeOf(ty) => {
                    self.out.write_str("size_of[")?;
                    self.ty(ty)?;
                    self.out.write_char(']')
                }
                HirConstant::Void => self.out.write_str("()"),
            },
        }
    }
}
