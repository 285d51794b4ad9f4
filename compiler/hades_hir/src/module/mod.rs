use hades_ir::QualifiedName;

use crate::HirDefinition;

/// An ordered set of definitions.
///
/// Names are not required to be unique: lookups by name return every
/// definition that carries it, and [`find_global_definition`] the first.
///
/// [`find_global_definition`]: HirModule::find_global_definition
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HirModule {
    definitions: Vec<HirDefinition>,
}

impl HirModule {
    pub fn new() -> Self {
        HirModule::default()
    }

    pub fn add_definition(&mut self, definition: HirDefinition) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[HirDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn find_global_definition(&self, name: &QualifiedName) -> Option<&HirDefinition> {
        self.definitions.iter().find(|def| def.name() == name)
    }

    pub fn find_definitions(&self, name: &QualifiedName) -> Vec<&HirDefinition> {
        self.definitions
            .iter()
            .filter(|def| def.name() == name)
            .collect()
    }

    /// Definitions that still carry type parameters.
    pub fn generic_definitions(&self) -> impl Iterator<Item = &HirDefinition> {
        self.definitions.iter().filter(|def| def.is_generic())
    }
}

impl FromIterator<HirDefinition> for HirModule {
    fn from_iter<I: IntoIterator<Item = HirDefinition>>(iter: I) -> Self {
        HirModule {
            definitions: iter.into_iter().collect(),
        }
    }
}
