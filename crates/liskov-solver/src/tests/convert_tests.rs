use super::*;
use crate::fixtures::fixture;

#[test]
fn value_payload_is_typed() {
    let fx = fixture();
    let value = Value::new(fx.text, String::from("some text"));

    assert_eq!(value.type_id(), fx.text);
    assert_eq!(value.payload_as::<String>().map(String::as_str), Some("some text"));
    assert_eq!(value.payload_as::<u32>(), None);
}

#[test]
fn identity_conversion_preserves_the_view() {
    let fx = fixture();
    let engine = fx.engine();
    let value = Value::new(fx.entity, "payload");

    let converted = engine.convert_as(&value, fx.entity).expect("identity view");
    assert_eq!(converted.type_id(), fx.entity);
    assert!(converted.shares_payload_with(&value));
}

#[test]
fn upcast_and_interface_views_share_the_payload() {
    let fx = fixture();
    let engine = fx.engine();
    let value = Value::new(fx.date_time_range, "range payload");

    let upcast = engine.convert_as(&value, fx.range_of(fx.date_time)).unwrap();
    assert_eq!(upcast.type_id(), fx.range_of(fx.date_time));
    assert!(upcast.shares_payload_with(&value));

    let viewed = engine.convert_as(&value, fx.comparable_of(fx.irange)).unwrap();
    assert_eq!(viewed.type_id(), fx.comparable_of(fx.irange));
    assert!(viewed.shares_payload_with(&value));
}

#[test]
fn converters_are_built_once_per_key() {
    let fx = fixture();
    let engine = fx.engine();
    let value = Value::new(fx.list_of(fx.entity), "entities");
    let expected = fx.collection_of(fx.entity_iface);

    assert_eq!(engine.converter_builds(), 0);
    for _ in 0..5 {
        let converted = engine.convert_as(&value, expected).unwrap();
        assert_eq!(converted.type_id(), expected);
    }
    assert_eq!(engine.converter_builds(), 1);

    // A different key builds its own converter.
    engine.convert_as(&value, fx.iterable_of(fx.entity_iface)).unwrap();
    assert_eq!(engine.converter_builds(), 2);
}

#[test]
fn non_convertible_values_yield_none_without_building() {
    let fx = fixture();
    let engine = fx.engine();
    let value = Value::new(fx.error, "an error");

    assert!(engine.convert_as(&value, fx.iterable).is_none());
    assert_eq!(engine.converter_builds(), 0);
}

#[test]
fn instance_checks_do_not_build_converters() {
    let fx = fixture();
    let engine = fx.engine();
    let value = Value::new(fx.list_of(fx.entity), "entities");

    assert!(engine.is_instance_of(&value, fx.collection_of(fx.entity_iface)));
    assert_eq!(
        engine.instance_view_of(&value, fx.collection),
        Some(fx.collection_of(fx.entity))
    );
    assert!(!engine.is_instance_of(&value, fx.comparable_of(fx.irange)));
    assert_eq!(engine.converter_builds(), 0);
}

#[test]
fn engines_can_share_caches() {
    let fx = fixture();
    let resolutions = std::sync::Arc::new(ResolutionCache::new());
    let converters = std::sync::Arc::new(ConverterCache::new());
    let a = ConversionEngine::with_caches(fx.model(), resolutions.clone(), converters.clone());
    let b = ConversionEngine::with_caches(fx.model(), resolutions.clone(), converters.clone());

    let value = Value::new(fx.list_of(fx.entity), "entities");
    a.convert_as(&value, fx.collection_of(fx.entity_iface)).unwrap();
    b.convert_as(&value, fx.collection_of(fx.entity_iface)).unwrap();

    assert_eq!(converters.builds(), 1);
    assert!(resolutions.stats().positive >= 1);
}
