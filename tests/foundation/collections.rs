//! Integration tests for collections
//!
//! Tests lists, vectors, maps and sets: construction, duplicate keys,
//! lookups, iteration, merging and canonical text.

use evaedn_foundation::{
    Collection, CollectionKind, Element, Error, ErrorKind, Pair, Pairs, Primitive,
};

fn kw(text: &str) -> Element {
    Element::keyword(text).unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn empty_collections_text() {
    assert_eq!(Element::list([]).to_string(), "()");
    assert_eq!(Element::vector([]).to_string(), "[]");
    assert_eq!(Element::map(Pairs::new()).unwrap().to_string(), "{}");
    assert_eq!(Element::set([]).unwrap().to_string(), "#{}");
}

#[test]
fn vector_of_nil() {
    assert_eq!(Element::vector([Element::nil()]).to_string(), "[nil]");
}

#[test]
fn map_text() {
    let map = Element::map([Pair::new(kw(":k"), Element::string("v"))]).unwrap();
    assert!(map.to_string().contains(":k \"v\""));
}

#[test]
fn absent_children_rejected() {
    for kind in [CollectionKind::List, CollectionKind::Vector, CollectionKind::Set] {
        let err = Collection::from_primitives(kind, [None::<Primitive>]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidElement(_)), "{kind:?}");
    }
}

#[test]
fn absent_pair_halves_rejected() {
    let err = Pair::from_primitives(Some(Primitive::from(":k")), None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPair(_)));
    let err = Pair::from_primitives(None, Some(Primitive::from(1))).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPair(_)));
}

#[test]
fn from_primitives_converts() {
    let list = Collection::from_primitives(
        CollectionKind::List,
        [Some(Primitive::from(1)), Some(Primitive::from("two")), Some(Primitive::from(":k"))],
    )
    .unwrap();
    assert_eq!(Element::from(list).to_string(), "(1 \"two\" :k)");
}

// =============================================================================
// Duplicate Keys
// =============================================================================

#[test]
fn duplicate_string_keys_rejected() {
    let err = Element::map([
        Pair::new(Element::string("key1"), Element::integer(1)),
        Pair::new(Element::string("key1"), Element::integer(1)),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));
}

#[test]
fn duplicate_set_members_rejected() {
    let err = Element::set([Element::integer(1), Element::integer(1)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));
}

#[test]
fn failed_append_leaves_collection_unchanged() {
    let mut set = Collection::from_elements(CollectionKind::Set, [Element::integer(1)]).unwrap();
    let err = set
        .append([Element::integer(2), Element::integer(1)])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));
    assert_eq!(set.len(), 1);
}

#[test]
fn odd_map_append_rejected() {
    let mut map = Collection::new(CollectionKind::Map);
    let err = map.append([kw(":a")]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));
    assert!(map.is_empty());
}

#[test]
fn constructors_keep_every_child() {
    let children = || [Element::integer(1), Element::integer(2)];
    assert_eq!(Collection::list(children()).len(), 2);
    assert_eq!(Collection::vector(children()).len(), 2);
    for kind in [CollectionKind::Map, CollectionKind::Set] {
        let keyed = Collection::from_elements(kind, children()).unwrap();
        assert_eq!(keyed.kind(), kind);
        assert!(!keyed.is_empty(), "{kind:?}");
    }
}

// =============================================================================
// Append and Prepend
// =============================================================================

#[test]
fn ordered_append_and_prepend() {
    let mut list = Collection::list([Element::integer(2)]);
    list.append([Element::integer(3)]).unwrap();
    list.prepend([Element::integer(0), Element::integer(1)]).unwrap();
    assert_eq!(Element::from(list).to_string(), "(0 1 2 3)");
}

#[test]
fn keyed_prepend_appends() {
    let mut set = Collection::new(CollectionKind::Set);
    set.prepend([kw(":a")]).unwrap();
    set.append([kw(":b")]).unwrap();
    assert_eq!(set.len(), 2);
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn ordered_get() {
    let vector = Collection::vector([Element::string("a"), Element::string("b")]);
    assert_eq!(vector.get(1).unwrap().as_str(), Some("b"));
    assert!(matches!(vector.get(2).unwrap_err().kind, ErrorKind::NoValue(_)));
    assert!(matches!(vector.get(-1).unwrap_err().kind, ErrorKind::NoValue(_)));
    assert!(matches!(
        vector.get("first").unwrap_err().kind,
        ErrorKind::InvalidInput(_)
    ));
}

#[test]
fn keyed_get() {
    let mut map = Collection::new(CollectionKind::Map);
    map.append([kw(":a"), Element::integer(1)]).unwrap();
    map.append([Element::string("b"), Element::integer(2)]).unwrap();

    assert_eq!(map.get(&kw(":a")).unwrap().as_int(), Some(1));
    assert_eq!(map.get(":a").unwrap().as_int(), Some(1));
    assert_eq!(map.get(&Element::string("b")).unwrap().as_int(), Some(2));
    assert_eq!(map.get("b").unwrap().as_int(), Some(2));
    assert!(matches!(map.get(":zzz").unwrap_err().kind, ErrorKind::NoValue(_)));
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn iterate_children_visits_all() {
    let vector = Collection::vector([Element::integer(10), Element::integer(20)]);
    let mut seen = Vec::new();
    vector
        .iterate_children(|key, value| {
            seen.push((key.as_int(), value.as_int()));
            Ok(())
        })
        .unwrap();
    assert_eq!(seen, vec![(Some(0), Some(10)), (Some(1), Some(20))]);
}

#[test]
fn iterate_children_short_circuits() {
    let list = Collection::list((0..10).map(Element::integer));
    let mut visited = 0;
    let err = list
        .iterate_children(|_, value| {
            visited += 1;
            if value.as_int() == Some(3) {
                return Err(Error::no_value("stop"));
            }
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoValue(_)));
    assert_eq!(visited, 4);
}

// =============================================================================
// Merge
// =============================================================================

#[test]
fn merge_vectors() {
    let mut left = Collection::vector([Element::integer(1)]);
    let right = Collection::vector([Element::integer(2)]);
    left.merge(&right).unwrap();
    assert_eq!(Element::from(left).to_string(), "[1 2]");
}

#[test]
fn merge_maps() {
    let mut left = Collection::from_pairs([Pair::new(kw(":a"), Element::integer(1))].into()).unwrap();
    let right = Collection::from_pairs([Pair::new(kw(":b"), Element::integer(2))].into()).unwrap();
    left.merge(&right).unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(left.get(":b").unwrap().as_int(), Some(2));
}

#[test]
fn merge_duplicate_fails() {
    let mut left = Collection::from_elements(CollectionKind::Set, [Element::integer(1)]).unwrap();
    let right = Collection::from_elements(CollectionKind::Set, [Element::integer(1)]).unwrap();
    assert!(matches!(
        left.merge(&right).unwrap_err().kind,
        ErrorKind::DuplicateKey(_)
    ));
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn collection_equality() {
    let a = Element::vector([Element::integer(1), Element::integer(2)]);
    let b = Element::vector([Element::integer(1), Element::integer(2)]);
    let c = Element::vector([Element::integer(2), Element::integer(1)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, Element::list([Element::integer(1), Element::integer(2)]));
    assert_eq!(Element::set([]).unwrap(), Element::set([]).unwrap());
}

#[test]
fn set_equality_ignores_order() {
    let a = Element::set([kw(":x"), kw(":y")]).unwrap();
    let b = Element::set([kw(":y"), kw(":x")]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn nested_text() {
    let inner = Element::set([kw(":z")]).unwrap();
    let map = Element::map([Pair::new(kw(":inner"), inner)]).unwrap();
    let outer = Element::list([map, Element::vector([Element::nil()])]);
    assert_eq!(outer.to_string(), "({:inner #{:z}} [nil])");
}
