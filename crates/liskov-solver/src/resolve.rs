//! Liskov variance resolution.
//!
//! Decides whether an actual descriptor is substitutable for an expected
//! descriptor under covariant substitution rules, and if so, what the most
//! specific expected-compatible view type is. The resolver leans on the
//! model's native nominal-subtype rule for everything reflection can answer
//! directly, and only reasons about variance where generics make the
//! nominal rule too strict.
//!
//! Interface enumeration order is whatever the model exposes; when a type
//! reaches the same generic interface through two differently-parameterized
//! routes, the first enumerated match wins. Well-formed hierarchies do not
//! do this, and it is not defended against.

use crate::cache::{Outcome, ResolutionCache};
use liskov_model::{TypeData, TypeId, TypeModel};
use tracing::trace;

/// The variance-resolution algorithm over a type model and a shared memo.
///
/// Stateless apart from its borrows; construct freely around a model and a
/// cache.
pub struct VarianceSolver<'a> {
    model: &'a dyn TypeModel,
    cache: &'a ResolutionCache,
}

impl<'a> VarianceSolver<'a> {
    pub fn new(model: &'a dyn TypeModel, cache: &'a ResolutionCache) -> Self {
        Self { model, cache }
    }

    /// Whether `actual` may be viewed as `expected`, without the result
    /// type.
    pub fn is_variant_of(&self, actual: TypeId, expected: TypeId) -> bool {
        self.resolve(actual, expected).is_convertible()
    }

    /// Resolve variance between two descriptors.
    ///
    /// First matching step wins: identity, negative memo, open-into-closed
    /// guard, native nominal check, positive memo, base-chain match for a
    /// class/struct expectation, interface match with constraint checking.
    /// Every computed outcome is recorded before it is returned.
    pub fn resolve(&self, actual: TypeId, expected: TypeId) -> Outcome {
        if actual == expected {
            return Outcome::Convertible(actual);
        }
        let key = (actual, expected);
        let (Some(actual_data), Some(expected_data)) =
            (self.model.lookup(actual), self.model.lookup(expected))
        else {
            // Malformed input: an id the model does not know is never
            // convertible, and not worth memoizing.
            return Outcome::NotConvertible;
        };

        if self.cache.is_negative(key) {
            return Outcome::NotConvertible;
        }
        // An unbound type can never be substituted into a fully concrete
        // expectation.
        if actual_data.is_open() && !expected_data.is_open() {
            self.cache.record_negative(key);
            return Outcome::NotConvertible;
        }

        if self.model.is_assignable_from(expected, actual) {
            let result = self.cache.record_positive(key, expected);
            return Outcome::Convertible(result);
        }
        if let Some(result) = self.cache.positive(key) {
            return Outcome::Convertible(result);
        }

        trace!(
            actual = %self.model.display(actual),
            expected = %self.model.display(expected),
            "resolve: entering variance search"
        );

        let outcome = if expected_data.is_interface() {
            self.resolve_interface(actual, &actual_data, expected, &expected_data)
        } else {
            self.resolve_base_chain(actual, &expected_data)
        };

        match outcome {
            Some(result) => {
                let result = self.cache.record_positive(key, result);
                Outcome::Convertible(result)
            }
            None => {
                self.cache.record_negative(key);
                Outcome::NotConvertible
            }
        }
    }

    /// Class/struct expectation: walk the base-type chain from `actual`
    /// itself, looking for a generic ancestor sharing the expected generic
    /// definition.
    fn resolve_base_chain(&self, actual: TypeId, expected_data: &TypeData) -> Option<TypeId> {
        let expected_def = expected_data.generic_definition()?;
        let mut cur = Some(actual);
        while let Some(id) = cur {
            let data = self.model.lookup(id)?;
            if data.generic_definition() == Some(expected_def) {
                trace!(ancestor = %self.model.display(id), "resolve: generic base-chain match");
                return Some(id);
            }
            cur = data.base;
        }
        None
    }

    /// Interface expectation: try `actual` itself when it shares the
    /// expected generic definition, then each implemented interface of
    /// matching arity whose generic definition is itself variant of the
    /// expected one.
    fn resolve_interface(
        &self,
        actual: TypeId,
        actual_data: &TypeData,
        expected: TypeId,
        expected_data: &TypeData,
    ) -> Option<TypeId> {
        let expected_def = expected_data.generic_definition()?;
        let expected_arity = expected_data.generic_arity();

        if actual_data.generic_definition() == Some(expected_def)
            && let Some(result) = self.check_constraints(actual, actual_data, expected, expected_data)
        {
            return Some(result);
        }

        for candidate in self.model.implemented_interfaces(actual) {
            let Some(candidate_data) = self.model.lookup(candidate) else {
                continue;
            };
            let Some(candidate_def) = candidate_data.generic_definition() else {
                continue;
            };
            if candidate_data.generic_arity() != expected_arity {
                continue;
            }
            // Definition-to-definition variance first; this is what lets an
            // open generic expectation match a closed candidate interface.
            if !self.is_variant_of(candidate_def, expected_def) {
                continue;
            }
            if let Some(result) =
                self.check_constraints(candidate, &candidate_data, expected, expected_data)
            {
                trace!(
                    candidate = %self.model.display(candidate),
                    result = %self.model.display(result),
                    "resolve: interface match"
                );
                return Some(result);
            }
        }
        None
    }

    /// Check the candidate's generic arguments against the expected
    /// argument list, producing the substituted result type on success.
    ///
    /// The caller has verified that the definitions are variance-compatible
    /// and the arities equal. Per position: a concrete expected argument is
    /// resolved recursively (nested covariance) and contributes its result
    /// type; an unbound parameter only validates its constraints and passes
    /// the candidate argument through unchanged.
    fn check_constraints(
        &self,
        candidate: TypeId,
        candidate_data: &TypeData,
        expected: TypeId,
        expected_data: &TypeData,
    ) -> Option<TypeId> {
        let candidate_args = candidate_data.generic_args();
        let expected_args = expected_data.generic_args();
        debug_assert_eq!(
            candidate_args.len(),
            expected_args.len(),
            "constraint check on mismatched arities: {} vs {}",
            self.model.display(candidate),
            self.model.display(expected),
        );
        if candidate_args.len() != expected_args.len() {
            return None;
        }

        let mut substituted = Vec::with_capacity(expected_args.len());
        for (&candidate_arg, &expected_arg) in candidate_args.iter().zip(expected_args) {
            let expected_arg_data = self.model.lookup(expected_arg)?;
            if expected_arg_data.is_param() {
                for &constraint in &expected_arg_data.constraints {
                    if !self.is_variant_of(candidate_arg, constraint) {
                        return None;
                    }
                }
                // The parameter is validated, not narrowed.
                substituted.push(candidate_arg);
            } else {
                match self.resolve(candidate_arg, expected_arg) {
                    Outcome::Convertible(result) => substituted.push(result),
                    Outcome::NotConvertible => return None,
                }
            }
        }

        let expected_def = expected_data.generic_definition()?;
        let result = self.model.instantiate(expected_def, &substituted);
        if !result.is_valid() {
            return None;
        }
        Some(result)
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
