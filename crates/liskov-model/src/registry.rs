//! Concurrent descriptor registry.
//!
//! `TypeRegistry` owns every descriptor in a type model. It provides:
//!
//! - builders for declaring classes, interfaces, and generic parameters;
//! - registration-time fixups (`set_base`, `add_interface`,
//!   `set_constraints`) for self-referential shapes such as
//!   `Range<T> : Comparable<Range<T>>`;
//! - [`instantiate`](TypeRegistry::instantiate), the substituted-type
//!   constructor, with structural interning so that binding the same
//!   arguments into the same definition twice yields the same [`TypeId`].
//!
//! The registry is append-only and safe for concurrent readers. Descriptor
//! declaration and fixups belong to model setup; resolution may then run
//! from arbitrary threads.

use crate::types::{GenericArgs, GenericInfo, TypeData, TypeFlags, TypeId, TypeKind};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `TypeRegistry`
/// instances. Used for debugging id collision issues across registries.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Thread-safe storage for type descriptors.
///
/// Uses `DashMap` for concurrent access from multiple resolving threads.
pub struct TypeRegistry {
    /// Unique instance ID for debugging (tracks which registry this is).
    instance_id: u64,

    /// `TypeId` -> descriptor data.
    types: DashMap<TypeId, Arc<TypeData>>,

    /// Structural interning of generic instantiations:
    /// (definition, args) -> instantiated `TypeId`.
    instantiations: DashMap<(TypeId, GenericArgs), TypeId>,

    /// Next available `TypeId`.
    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeRegistry::new - creating new instance");
        Self {
            instance_id,
            types: DashMap::new(),
            instantiations: DashMap::new(),
            next_id: AtomicU32::new(TypeId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `TypeId`.
    fn allocate(&self) -> TypeId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        TypeId(id)
    }

    fn register(&self, data: TypeData) -> TypeId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            kind = ?data.kind,
            name = %data.name,
            "TypeRegistry::register"
        );
        self.types.insert(id, Arc::new(data));
        id
    }

    /// Get descriptor data by id.
    pub fn get(&self, id: TypeId) -> Option<Arc<TypeData>> {
        self.types.get(&id).map(|r| Arc::clone(&r))
    }

    /// Check if an id is registered.
    pub fn contains(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }

    // -----------------------------------------------------------------------
    // Declaration builders
    // -----------------------------------------------------------------------

    /// Declare a non-generic class.
    pub fn class(&self, name: &str, base: Option<TypeId>, interfaces: &[TypeId]) -> TypeId {
        self.register(TypeData {
            name: name.to_string(),
            kind: TypeKind::Class,
            generic: None,
            base,
            interfaces: interfaces.to_vec(),
            constraints: Vec::new(),
            flags: TypeFlags::empty(),
        })
    }

    /// Declare a non-generic interface.
    pub fn interface(&self, name: &str, interfaces: &[TypeId]) -> TypeId {
        self.register(TypeData {
            name: name.to_string(),
            kind: TypeKind::Interface,
            generic: None,
            base: None,
            interfaces: interfaces.to_vec(),
            constraints: Vec::new(),
            flags: TypeFlags::empty(),
        })
    }

    /// Declare an unbound generic parameter.
    ///
    /// Constraints referring to the parameter itself (`T : Comparable<T>`)
    /// are attached afterwards with [`set_constraints`](Self::set_constraints).
    pub fn param(&self, name: &str) -> TypeId {
        self.register(TypeData {
            name: name.to_string(),
            kind: TypeKind::Param,
            generic: None,
            base: None,
            interfaces: Vec::new(),
            constraints: Vec::new(),
            flags: TypeFlags::CONTAINS_PARAMS,
        })
    }

    /// Declare a generic class definition over `params`.
    ///
    /// The definition refers to itself as its own generic definition, with
    /// its parameters as arguments. Base and interfaces expressed in terms
    /// of the definition itself are attached afterwards with
    /// [`set_base`](Self::set_base) / [`add_interface`](Self::add_interface).
    pub fn generic_class(&self, name: &str, params: &[TypeId], base: Option<TypeId>) -> TypeId {
        self.generic_definition(name, TypeKind::Class, params, base, &[])
    }

    /// Declare a generic interface definition over `params`.
    pub fn generic_interface(&self, name: &str, params: &[TypeId], interfaces: &[TypeId]) -> TypeId {
        self.generic_definition(name, TypeKind::Interface, params, None, interfaces)
    }

    fn generic_definition(
        &self,
        name: &str,
        kind: TypeKind,
        params: &[TypeId],
        base: Option<TypeId>,
        interfaces: &[TypeId],
    ) -> TypeId {
        debug_assert!(
            params.iter().all(|p| self.kind_of(*p) == Some(TypeKind::Param)),
            "generic definition arguments must be Param descriptors"
        );
        let id = self.allocate();
        let data = TypeData {
            name: name.to_string(),
            kind,
            generic: Some(GenericInfo {
                definition: id,
                args: GenericArgs::from_slice(params),
            }),
            base,
            interfaces: interfaces.to_vec(),
            constraints: Vec::new(),
            flags: TypeFlags::CONTAINS_PARAMS,
        };
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            kind = ?kind,
            name = %name,
            arity = params.len(),
            "TypeRegistry::register (generic definition)"
        );
        self.types.insert(id, Arc::new(data));
        id
    }

    // -----------------------------------------------------------------------
    // Registration-time fixups
    // -----------------------------------------------------------------------

    /// Set the base type of a declared class.
    pub fn set_base(&self, id: TypeId, base: TypeId) {
        if let Some(mut entry) = self.types.get_mut(&id) {
            let mut data = (**entry).clone();
            data.base = Some(base);
            *entry = Arc::new(data);
        }
    }

    /// Add a declared interface to a registered descriptor.
    ///
    /// Used for self-referential shapes (`DateTime : Comparable<DateTime>`)
    /// that cannot be expressed before the descriptor has an id.
    pub fn add_interface(&self, id: TypeId, iface: TypeId) {
        if let Some(mut entry) = self.types.get_mut(&id) {
            let mut data = (**entry).clone();
            data.interfaces.push(iface);
            *entry = Arc::new(data);
        }
    }

    /// Set the constraints of an unbound generic parameter.
    pub fn set_constraints(&self, param: TypeId, constraints: &[TypeId]) {
        debug_assert_eq!(
            self.kind_of(param),
            Some(TypeKind::Param),
            "constraints can only be attached to Param descriptors"
        );
        if let Some(mut entry) = self.types.get_mut(&param) {
            let mut data = (**entry).clone();
            data.constraints = constraints.to_vec();
            *entry = Arc::new(data);
        }
    }

    // -----------------------------------------------------------------------
    // Generic instantiation
    // -----------------------------------------------------------------------

    /// Bind `args` into a generic definition, producing the substituted
    /// type.
    ///
    /// Instantiations are structurally interned: the same (definition,
    /// args) pair always yields the same id. Binding a definition's own
    /// parameters back into it yields the definition itself.
    ///
    /// The interning entry is published before the substituted base and
    /// interface lists are computed, so self-referential instantiations
    /// (`Range<DateTime> : Comparable<Range<DateTime>>`) resolve to the id
    /// being built instead of recursing forever.
    ///
    /// Returns [`TypeId::INVALID`] if `definition` is unknown, not a
    /// definition, or the argument count does not match its arity.
    pub fn instantiate(&self, definition: TypeId, args: &[TypeId]) -> TypeId {
        let Some(def) = self.get(definition) else {
            return TypeId::INVALID;
        };
        let Some(generic) = def.generic.clone() else {
            return TypeId::INVALID;
        };
        if generic.definition != definition || generic.args.len() != args.len() {
            return TypeId::INVALID;
        }
        if generic.args.as_slice() == args {
            return definition;
        }

        let key = (definition, GenericArgs::from_slice(args));
        if let Some(existing) = self.instantiations.get(&key) {
            return *existing;
        }

        let id = self.allocate();
        {
            // Publish-or-lose: the entry guard must be dropped before the
            // recursive substitution below touches other shards.
            match self.instantiations.entry(key) {
                dashmap::mapref::entry::Entry::Occupied(e) => return *e.get(),
                dashmap::mapref::entry::Entry::Vacant(v) => {
                    v.insert(id);
                }
            }
        }

        let mut map = FxHashMap::default();
        for (param, arg) in generic.args.iter().zip(args.iter()) {
            map.insert(*param, *arg);
        }
        let base = def.base.map(|b| self.substitute(b, &map));
        let interfaces = def
            .interfaces
            .iter()
            .map(|i| self.substitute(*i, &map))
            .collect();
        let flags = if args.iter().any(|a| self.contains_params(*a)) {
            TypeFlags::CONTAINS_PARAMS
        } else {
            TypeFlags::empty()
        };
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            definition = definition.0,
            "TypeRegistry::instantiate"
        );
        self.types.insert(
            id,
            Arc::new(TypeData {
                name: def.name.clone(),
                kind: def.kind,
                generic: Some(GenericInfo {
                    definition,
                    args: GenericArgs::from_slice(args),
                }),
                base,
                interfaces,
                constraints: Vec::new(),
                flags,
            }),
        );
        id
    }

    /// Rewrite `id` under a parameter-to-argument substitution map.
    ///
    /// Parameters map directly; open generic descriptors are re-instantiated
    /// with substituted arguments; everything closed passes through.
    fn substitute(&self, id: TypeId, map: &FxHashMap<TypeId, TypeId>) -> TypeId {
        if let Some(mapped) = map.get(&id) {
            return *mapped;
        }
        let Some(data) = self.get(id) else {
            return id;
        };
        if !data.is_open() {
            return id;
        }
        let Some(generic) = &data.generic else {
            // An unbound parameter outside the map stays unbound.
            return id;
        };
        let new_args: Vec<TypeId> = generic
            .args
            .iter()
            .map(|a| self.substitute(*a, map))
            .collect();
        if new_args.as_slice() == generic.args.as_slice() {
            return id;
        }
        self.instantiate(generic.definition, &new_args)
    }

    fn contains_params(&self, id: TypeId) -> bool {
        self.get(id).is_some_and(|d| d.is_open())
    }

    fn kind_of(&self, id: TypeId) -> Option<TypeKind> {
        self.get(id).map(|d| d.kind)
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    /// Render a descriptor for diagnostics, e.g. `Collection<IEntity>`.
    pub fn display(&self, id: TypeId) -> String {
        let Some(data) = self.get(id) else {
            return format!("<unknown:{}>", id.0);
        };
        match &data.generic {
            Some(generic) => {
                let args: Vec<String> =
                    generic.args.iter().map(|a| self.display(*a)).collect();
                format!("{}<{}>", data.name, args.join(", "))
            }
            None => data.name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
