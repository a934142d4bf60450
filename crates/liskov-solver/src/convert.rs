//! Instance conversion on top of variance resolution.
//!
//! A [`Value`] is a concrete instance: a payload plus the descriptor it is
//! currently viewed under. Converting a value to an expected descriptor
//! resolves (runtime type, expected) through the solver, then applies a
//! cached converter for the key. The set of needed conversions is
//! statically enumerable from the variance outcomes, so converters are a
//! small closed set of payload-preserving re-typings rather than generated
//! code.
//!
//! A converter is built at most once per key, even under concurrent first
//! use; subsequent conversions reuse it.

use crate::cache::{Outcome, ResolutionCache, ResolutionKey};
use crate::resolve::VarianceSolver;
use dashmap::DashMap;
use liskov_model::{TypeId, TypeKind, TypeModel};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// A concrete instance: shared payload viewed under a descriptor.
///
/// Conversion never touches the payload; it produces a new `Value` sharing
/// the payload under the resolved view type.
#[derive(Clone)]
pub struct Value {
    type_id: TypeId,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Wrap a payload under its runtime descriptor.
    pub fn new<P: Any + Send + Sync>(type_id: TypeId, payload: P) -> Self {
        Self {
            type_id,
            payload: Arc::new(payload),
        }
    }

    /// The descriptor this value is currently viewed under.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Borrow the payload as its concrete Rust type.
    pub fn payload_as<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref::<P>()
    }

    /// Whether two values share the same payload (view changes preserve
    /// the payload).
    pub fn shares_payload_with(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

/// Conversion strategy, selected at resolution time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ConversionKind {
    /// Result type equals the source type.
    Identity,
    /// View as an ancestor on the base chain.
    Upcast,
    /// View through an implemented (possibly substituted) interface.
    InterfaceView,
}

/// A built converter for one (actual, expected) key.
struct Converter {
    source: TypeId,
    result: TypeId,
    kind: ConversionKind,
}

impl Converter {
    fn select(model: &dyn TypeModel, source: TypeId, result: TypeId) -> Self {
        let kind = if source == result {
            ConversionKind::Identity
        } else if model.lookup(result).is_some_and(|d| d.kind == TypeKind::Interface) {
            ConversionKind::InterfaceView
        } else {
            ConversionKind::Upcast
        };
        Self {
            source,
            result,
            kind,
        }
    }

    /// Apply the conversion. Infallible by construction: a positive
    /// resolution guarantees the view exists; applying a converter to a
    /// value of the wrong runtime type is a resolver defect, not a runtime
    /// condition.
    fn apply(&self, value: &Value) -> Value {
        debug_assert_eq!(
            value.type_id, self.source,
            "converter applied to a value of the wrong runtime type"
        );
        Value {
            type_id: self.result,
            payload: Arc::clone(&value.payload),
        }
    }
}

struct ConverterEntry {
    result: TypeId,
    converter: OnceCell<Converter>,
}

/// Lazily built, build-once converter store.
pub struct ConverterCache {
    entries: DashMap<ResolutionKey, Arc<ConverterEntry>>,
    builds: AtomicU64,
}

impl Default for ConverterCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            builds: AtomicU64::new(0),
        }
    }

    /// Number of converters actually built. Observable probe for the
    /// build-once guarantee.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::SeqCst)
    }

    fn entry(&self, key: ResolutionKey, result: TypeId) -> Arc<ConverterEntry> {
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| {
                Arc::new(ConverterEntry {
                    result,
                    converter: OnceCell::new(),
                })
            })
            .clone();
        debug_assert_eq!(
            entry.result, result,
            "conflicting result types recorded for one conversion key"
        );
        entry
    }

    fn convert(
        &self,
        model: &dyn TypeModel,
        key: ResolutionKey,
        result: TypeId,
        value: &Value,
    ) -> Value {
        let entry = self.entry(key, result);
        let converter = entry.converter.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::SeqCst);
            let converter = Converter::select(model, key.0, result);
            trace!(
                source = %model.display(key.0),
                result = %model.display(result),
                kind = ?converter.kind,
                "building converter"
            );
            converter
        });
        converter.apply(value)
    }
}

/// Instance-level conversion API.
///
/// Owns shared handles to the model and both caches; clones share state.
/// Construct once at startup and pass around, or give each test its own
/// engine for isolation.
#[derive(Clone)]
pub struct ConversionEngine {
    model: Arc<dyn TypeModel>,
    resolutions: Arc<ResolutionCache>,
    converters: Arc<ConverterCache>,
}

impl ConversionEngine {
    /// Engine with fresh caches.
    pub fn new(model: Arc<dyn TypeModel>) -> Self {
        Self::with_caches(model, Arc::new(ResolutionCache::new()), Arc::new(ConverterCache::new()))
    }

    /// Engine over externally owned caches (shared across engines).
    pub fn with_caches(
        model: Arc<dyn TypeModel>,
        resolutions: Arc<ResolutionCache>,
        converters: Arc<ConverterCache>,
    ) -> Self {
        Self {
            model,
            resolutions,
            converters,
        }
    }

    /// The underlying resolution memo.
    pub fn resolution_cache(&self) -> &ResolutionCache {
        &self.resolutions
    }

    /// Number of converters built so far.
    pub fn converter_builds(&self) -> u64 {
        self.converters.builds()
    }

    /// Resolve variance between two descriptors.
    pub fn resolve(&self, actual: TypeId, expected: TypeId) -> Outcome {
        VarianceSolver::new(&*self.model, &self.resolutions).resolve(actual, expected)
    }

    /// Convert a value to the resolved view of `expected`.
    ///
    /// `None` is the ordinary not-convertible outcome, never an error.
    pub fn convert_as(&self, value: &Value, expected: TypeId) -> Option<Value> {
        let actual = value.type_id();
        match self.resolve(actual, expected) {
            Outcome::NotConvertible => None,
            Outcome::Convertible(result) => {
                let converted =
                    self.converters
                        .convert(&*self.model, (actual, expected), result, value);
                Some(converted)
            }
        }
    }

    /// Whether `value` can be viewed as `expected`. Cheaper existence
    /// check: resolver and memo only, no converter involved.
    pub fn is_instance_of(&self, value: &Value, expected: TypeId) -> bool {
        self.resolve(value.type_id(), expected).is_convertible()
    }

    /// Result-type-returning variant of [`is_instance_of`](Self::is_instance_of).
    pub fn instance_view_of(&self, value: &Value, expected: TypeId) -> Option<TypeId> {
        self.resolve(value.type_id(), expected).result_type()
    }
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
