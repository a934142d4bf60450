//! Interned type descriptors.
//!
//! A descriptor is the identity of a reflective type: its kind (class,
//! interface, or unbound generic parameter), its generic shape if any, its
//! base type, the interfaces it declares, and — for parameters only — the
//! constraints a substituted argument must satisfy.
//!
//! Descriptors are immutable once registered and are referred to by
//! [`TypeId`], so descriptor equality is `TypeId` equality (O(1)).

use bitflags::bitflags;
use smallvec::SmallVec;

/// Interned descriptor identifier.
///
/// Owned by the [`TypeRegistry`](crate::TypeRegistry); two descriptors are
/// the same type if and only if their ids are equal. Generic instantiations
/// are structurally interned, so instantiating the same definition with the
/// same arguments always yields the same id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for an invalid `TypeId`.
    pub const INVALID: Self = Self(0);

    /// First valid `TypeId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `TypeId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Kind of type descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Concrete (or generic) class. Participates in the base-type chain.
    Class,
    /// Interface. Matched through the implemented-interface set.
    Interface,
    /// Unbound generic parameter. Carries constraints, never instances.
    Param,
}

bitflags! {
    /// Descriptor flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// The descriptor still contains unbound generic parameters
        /// (an "open" generic, or a parameter itself).
        const CONTAINS_PARAMS = 1 << 0;
    }
}

/// Ordered generic-argument list.
///
/// Almost every generic type in practice has a handful of arguments, so the
/// list is inlined.
pub type GenericArgs = SmallVec<[TypeId; 4]>;

/// Generic shape of a descriptor: the definition it instantiates and the
/// ordered arguments bound into it.
///
/// A generic *definition* refers to itself as its own `definition`, and its
/// `args` are its own `Param` descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericInfo {
    /// The unparameterized template identity.
    pub definition: TypeId,
    /// Ordered arguments bound into the definition.
    pub args: GenericArgs,
}

/// Immutable data of a registered descriptor.
#[derive(Clone, Debug)]
pub struct TypeData {
    /// Simple name of the type (the definition's name for instantiations).
    /// Used for display and diagnostics only, never for identity.
    pub name: String,

    /// Kind of this descriptor.
    pub kind: TypeKind,

    /// Generic shape, absent for non-generic types and parameters.
    pub generic: Option<GenericInfo>,

    /// Base-type link (single inheritance). `None` for interfaces,
    /// parameters, and the hierarchy root.
    pub base: Option<TypeId>,

    /// Interfaces declared directly on this descriptor, in declaration
    /// order. Inherited interfaces are reached through `base` and through
    /// the interfaces' own lists.
    pub interfaces: Vec<TypeId>,

    /// Constraint types. Only meaningful for `Param` descriptors.
    pub constraints: Vec<TypeId>,

    /// Descriptor flags.
    pub flags: TypeFlags,
}

impl TypeData {
    /// Whether this descriptor is an interface.
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether this descriptor is an unbound generic parameter.
    #[inline]
    pub fn is_param(&self) -> bool {
        self.kind == TypeKind::Param
    }

    /// Whether this descriptor still contains unbound generic parameters.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.flags.contains(TypeFlags::CONTAINS_PARAMS)
    }

    /// Whether this descriptor is generic (a definition or an
    /// instantiation).
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.generic.is_some()
    }

    /// The generic definition this descriptor instantiates, if any.
    /// A definition returns itself.
    #[inline]
    pub fn generic_definition(&self) -> Option<TypeId> {
        self.generic.as_ref().map(|g| g.definition)
    }

    /// Ordered generic arguments, empty for non-generic descriptors.
    #[inline]
    pub fn generic_args(&self) -> &[TypeId] {
        match &self.generic {
            Some(g) => g.args.as_slice(),
            None => &[],
        }
    }

    /// Number of generic arguments (the arity for a definition).
    #[inline]
    pub fn generic_arity(&self) -> usize {
        self.generic_args().len()
    }
}
