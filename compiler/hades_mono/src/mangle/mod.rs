use hades_ir::{QualifiedName, StringInterner};
use hades_types::Type;

/// Name of the specialization of `name` at `type_args`.
///
/// The last segment gains a `$[..]` suffix listing the arguments as they
/// display, comma-separated: `main.identity` at `CInt` is
/// `main.identity$[CInt]`. Distinct argument lists give distinct names.
pub fn specialized_name(
    name: &QualifiedName,
    type_args: &[Type],
    interner: &StringInterner,
) -> QualifiedName {
    let args = type_args
        .iter()
        .map(|ty| ty.display(interner).to_string())
        .collect::<Vec<_>>()
        .join(",");
    name.map_last(|last| interner.intern(&format!("{}$[{args}]", interner.lookup(last))))
}
