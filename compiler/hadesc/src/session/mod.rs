//! One compilation.

use hades_hir::HirModule;
use hades_ir::ast::Program;
use hades_ir::StringInterner;
use hades_resolve::ScopeResolver;
use hades_types::{Checker, TypedProgram};
use tracing::debug;

use crate::{CompileError, Options};

/// Runs the checker and monomorphization over one program, sharing an
/// interner and [`Options`].
pub struct Session<'i> {
    interner: &'i StringInterner,
    options: Options,
}

impl<'i> Session<'i> {
    pub fn new(interner: &'i StringInterner, options: Options) -> Self {
        Session { interner, options }
    }

    pub fn interner(&self) -> &'i StringInterner {
        self.interner
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolve names and type check every declaration of `program`.
    ///
    /// # Errors
    /// [`CompileError::TypeCheck`] with every reported error, after the
    /// session's diagnostic filtering.
    #[tracing::instrument(level = "debug", skip_all, fields(files = program.files.len()))]
    pub fn check<'ast>(&self, program: &'ast Program) -> Result<TypedProgram<'ast>, CompileError> {
        let resolver = ScopeResolver::new(program);
        let mut checker = Checker::new(&resolver, self.interner);
        checker.check_program(program);
        let typed = checker.finish();

        if typed.has_errors() {
            let diagnostics = typed.diagnostics(self.interner, self.options.diagnostics.clone());
            debug!(
                errors = typed.errors().len(),
                reported = diagnostics.len(),
                "type checking failed"
            );
            return Err(CompileError::TypeCheck(diagnostics));
        }
        debug!(expressions = typed.expression_count(), "type checked");
        Ok(typed)
    }

    /// Monomorphize `module` and validate the result.
    ///
    /// # Errors
    /// [`CompileError::Mono`] when the specialization limit is hit,
    /// [`CompileError::Validation`] when generic residue survives.
    #[tracing::instrument(level = "debug", skip_all, fields(definitions = module.len()))]
    pub fn monomorphize(&self, module: &HirModule) -> Result<HirModule, CompileError> {
        let module = hades_mono::monomorphize(module, self.interner, self.options.mono)?;
        let errors = hades_mono::validate(&module, self.interner);
        if !errors.is_empty() {
            return Err(CompileError::Validation(errors));
        }
        Ok(module)
    }

    /// Check `program`, lower it with `lower`, then monomorphize.
    ///
    /// `lower` only runs on a program without type errors.
    pub fn compile<'ast>(
        &self,
        program: &'ast Program,
        lower: impl FnOnce(&'ast Program, &TypedProgram<'ast>) -> HirModule,
    ) -> Result<HirModule, CompileError> {
        let typed = self.check(program)?;
        let module = lower(program, &typed);
        self.monomorphize(&module)
    }
}

#[cfg(test)]
mod tests;
