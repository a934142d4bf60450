//! Reflective type model for the liskov variance resolver.
//!
//! This crate plays the role a host runtime's reflection services play for
//! a reflection-based variance checker: it owns the type descriptors and
//! answers the primitive questions the solver asks about them.
//!
//! - **Interned descriptors**: [`TypeId`] identity, O(1) equality
//! - **`TypeRegistry`**: concurrent, append-only descriptor store with
//!   structural interning of generic instantiations
//! - **Nominal walk**: the native (variance-free) assignability rule
//! - **[`TypeModel`]**: the capability trait the solver consumes
//!
//! The model supports generics, interfaces, single inheritance, and
//! constrained generic parameters. Descriptors are immutable once
//! registered; the solver only reads and recombines them.

mod assignable;
mod model;
mod registry;
pub mod types;

pub use model::TypeModel;
pub use registry::TypeRegistry;
pub use types::{GenericArgs, GenericInfo, TypeData, TypeFlags, TypeId, TypeKind};
