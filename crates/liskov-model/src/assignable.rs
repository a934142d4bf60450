//! Native nominal-subtype walk.
//!
//! This is the model's ordinary assignability rule: identity along the
//! base-type chain and the transitive implemented-interface set. It knows
//! nothing about variance — `Collection<Entity>` is *not* assignable to
//! `Collection<IEntity>` here. Variance reasoning on top of this primitive
//! is the solver's job.

use crate::registry::TypeRegistry;
use crate::types::TypeId;
use rustc_hash::FxHashSet;

impl TypeRegistry {
    /// Whether `actual` is assignable to `expected` under the nominal rule:
    /// `expected` is `actual` itself, an ancestor on its base chain, or an
    /// interface it implements (directly or transitively).
    pub fn is_assignable_from(&self, expected: TypeId, actual: TypeId) -> bool {
        if expected == actual {
            return true;
        }
        let mut visited = FxHashSet::default();
        let mut stack = vec![actual];
        while let Some(cur) = stack.pop() {
            if cur == expected {
                return true;
            }
            if !visited.insert(cur) {
                continue;
            }
            let Some(data) = self.get(cur) else {
                continue;
            };
            if let Some(base) = data.base {
                stack.push(base);
            }
            stack.extend(data.interfaces.iter().copied());
        }
        false
    }

    /// Every interface `id` implements, in breadth-first model order:
    /// declared interfaces first, then interfaces reached through them and
    /// through the base chain.
    ///
    /// The order is whatever the model exposes; callers must not rely on a
    /// canonical ordering (mirrors the reflection services this models).
    pub fn implemented_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::new();

        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(data) = self.get(c) else { break };
            queue.extend(data.interfaces.iter().copied());
            cur = data.base;
        }
        while let Some(iface) = queue.pop_front() {
            if !seen.insert(iface) {
                continue;
            }
            result.push(iface);
            if let Some(data) = self.get(iface) {
                queue.extend(data.interfaces.iter().copied());
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/assignable_tests.rs"]
mod tests;
