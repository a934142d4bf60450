//! Liskov-style variance resolution and instance conversion.
//!
//! Answers one question over the reflective type model: given an actual
//! descriptor and an expected descriptor, is the actual type substitutable
//! for the expected type under covariant substitution rules — and if so,
//! what is the most specific expected-compatible type it can be viewed as?
//! On top of resolution, values can be converted (re-viewed) to the
//! resolved type.
//!
//! Key pieces:
//! - [`VarianceSolver`]: the recursive resolution algorithm with
//!   constraint-satisfaction for generic arguments
//! - [`ResolutionCache`]: process-wide append-only memo of outcomes
//! - [`ConversionEngine`]: instance conversion with build-once converters
//!
//! All operations are synchronous, CPU-bound, and safe under arbitrary
//! concurrent callers; outcomes per key are deterministic, so cache write
//! races are benign.

mod cache;
mod convert;
mod resolve;

pub use cache::{Outcome, ResolutionCache, ResolutionCacheStats, ResolutionKey};
pub use convert::{ConversionEngine, ConverterCache, Value};
pub use resolve::VarianceSolver;

// Test modules loaded from their defining source files via
// #[path = "tests/..."] declarations. Only suites that aren't loaded
// elsewhere are included here.
#[cfg(test)]
#[path = "../tests/variance_tests.rs"]
mod variance_tests;
// cache_tests: loaded from cache.rs
// convert_tests: loaded from convert.rs
// resolve_tests: loaded from resolve.rs
#[cfg(test)]
#[path = "../tests/conversion_tests.rs"]
mod conversion_tests;
#[cfg(test)]
#[path = "../tests/concurrency_tests.rs"]
mod concurrency_tests;
#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
