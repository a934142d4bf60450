use super::*;

fn hierarchy(reg: &TypeRegistry) -> (TypeId, TypeId, TypeId, TypeId, TypeId) {
    let ientity = reg.interface("IEntity", &[]);
    let object = reg.class("Object", None, &[]);
    let entity = reg.class("Entity", Some(object), &[ientity]);
    let special = reg.class("SpecialEntity", Some(entity), &[]);
    let unrelated = reg.class("Unrelated", Some(object), &[]);
    (ientity, object, entity, special, unrelated)
}

#[test]
fn assignable_along_base_chain() {
    let reg = TypeRegistry::new();
    let (_, object, entity, special, _) = hierarchy(&reg);

    assert!(reg.is_assignable_from(entity, special));
    assert!(reg.is_assignable_from(object, special));
    assert!(!reg.is_assignable_from(special, entity));
}

#[test]
fn assignable_through_interfaces() {
    let reg = TypeRegistry::new();
    let (ientity, _, entity, special, unrelated) = hierarchy(&reg);

    assert!(reg.is_assignable_from(ientity, entity));
    // Inherited through the base chain.
    assert!(reg.is_assignable_from(ientity, special));
    assert!(!reg.is_assignable_from(ientity, unrelated));
}

#[test]
fn no_variance_in_the_nominal_rule() {
    let reg = TypeRegistry::new();
    let (ientity, _object, entity, _, _) = hierarchy(&reg);
    let t = reg.param("T");
    let collection = reg.generic_interface("Collection", &[t], &[]);

    let coll_entity = reg.instantiate(collection, &[entity]);
    let coll_iface = reg.instantiate(collection, &[ientity]);
    assert!(!reg.is_assignable_from(coll_iface, coll_entity));
    assert!(reg.is_assignable_from(coll_entity, coll_entity));
}

#[test]
fn implemented_interfaces_are_transitive() {
    let reg = TypeRegistry::new();
    let t = reg.param("T");
    let iterable = reg.generic_interface("Iterable", &[t], &[]);
    let c = reg.param("T");
    let iter_c = reg.instantiate(iterable, &[c]);
    let collection = reg.generic_interface("Collection", &[c], &[iter_c]);
    let entity = reg.class("Entity", None, &[]);
    let l = reg.param("T");
    let list = reg.generic_class("List", &[l], None);
    reg.add_interface(list, reg.instantiate(collection, &[l]));

    let list_entity = reg.instantiate(list, &[entity]);
    let ifaces = reg.implemented_interfaces(list_entity);
    assert_eq!(
        ifaces,
        vec![
            reg.instantiate(collection, &[entity]),
            reg.instantiate(iterable, &[entity]),
        ]
    );
}
