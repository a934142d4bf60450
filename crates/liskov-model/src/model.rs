//! The capability interface the variance solver consumes.
//!
//! The solver never talks to `TypeRegistry` directly; it sees a type model
//! through this trait, the way reflection-based code sees a host runtime's
//! reflection services. Tests and embedders can supply adapters over other
//! descriptor sources.

use crate::registry::TypeRegistry;
use crate::types::{TypeData, TypeId};
use std::sync::Arc;

/// Reflective type model services.
///
/// Everything the variance resolver needs from the host model: descriptor
/// lookup, the native nominal-subtype predicate, interface enumeration, and
/// substituted-type construction.
pub trait TypeModel: Send + Sync {
    /// Look up descriptor data. `None` for ids the model does not know,
    /// which the solver treats as never-convertible (malformed input).
    fn lookup(&self, id: TypeId) -> Option<Arc<TypeData>>;

    /// The ordinary nominal-subtype rule, ignoring generic variance.
    fn is_assignable_from(&self, expected: TypeId, actual: TypeId) -> bool;

    /// Transitive implemented-interface enumeration, in model order.
    fn implemented_interfaces(&self, id: TypeId) -> Vec<TypeId>;

    /// Bind arguments into a generic definition (substituted-type
    /// constructor). [`TypeId::INVALID`] on malformed input.
    fn instantiate(&self, definition: TypeId, args: &[TypeId]) -> TypeId;

    /// Render a descriptor for diagnostics.
    fn display(&self, id: TypeId) -> String;
}

impl TypeModel for TypeRegistry {
    fn lookup(&self, id: TypeId) -> Option<Arc<TypeData>> {
        self.get(id)
    }

    fn is_assignable_from(&self, expected: TypeId, actual: TypeId) -> bool {
        TypeRegistry::is_assignable_from(self, expected, actual)
    }

    fn implemented_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        TypeRegistry::implemented_interfaces(self, id)
    }

    fn instantiate(&self, definition: TypeId, args: &[TypeId]) -> TypeId {
        TypeRegistry::instantiate(self, definition, args)
    }

    fn display(&self, id: TypeId) -> String {
        TypeRegistry::display(self, id)
    }
}
