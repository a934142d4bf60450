//! Concurrent cache population and build-once conversion.

use crate::fixtures::fixture;
use crate::{Outcome, Value};
use rayon::prelude::*;

#[test]
fn concurrent_resolution_converges_on_one_outcome() {
    let fx = fixture();
    let engine = fx.engine();
    let actual = fx.list_of(fx.specific_entity);
    let expected = fx.collection_of(fx.generic_entity_of(fx.entity_iface));

    let outcomes: Vec<Outcome> = (0..64)
        .into_par_iter()
        .map(|_| engine.resolve(actual, expected))
        .collect();

    let first = outcomes[0];
    assert_eq!(first, Outcome::Convertible(expected));
    assert!(outcomes.iter().all(|o| *o == first));
}

#[test]
fn concurrent_first_use_builds_the_converter_once() {
    let fx = fixture();
    let engine = fx.engine();
    let expected = fx.collection_of(fx.entity_iface);

    (0..64).into_par_iter().for_each(|i| {
        let instance = Value::new(fx.list_of(fx.entity), format!("batch-{i}"));
        let converted = engine.convert_as(&instance, expected).expect("covariant view");
        assert_eq!(converted.type_id(), expected);
    });

    assert_eq!(engine.converter_builds(), 1);
}

#[test]
fn mixed_positive_and_negative_traffic_is_stable() {
    let fx = fixture();
    let engine = fx.engine();

    (0..64).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            assert_eq!(
                engine.resolve(fx.list_of(fx.entity), fx.collection),
                Outcome::Convertible(fx.collection_of(fx.entity))
            );
        } else {
            assert_eq!(
                engine.resolve(fx.error, fx.iterable),
                Outcome::NotConvertible
            );
        }
    });

    let stats = engine.resolution_cache().stats();
    assert!(stats.positive >= 1);
    assert!(stats.negative >= 1);
}

#[test]
fn cloned_engines_share_state() {
    let fx = fixture();
    let engine = fx.engine();
    let clone = engine.clone();

    let instance = Value::new(fx.text, String::from("txt"));
    engine.convert_as(&instance, fx.iterable).unwrap();
    clone.convert_as(&instance, fx.iterable).unwrap();

    assert_eq!(engine.converter_builds(), 1);
    assert_eq!(clone.converter_builds(), 1);
}
