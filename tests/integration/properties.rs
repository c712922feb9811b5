//! Property tests that span both layers: tags, duplicate keys, the symbol
//! grammar and native values entering through the type registry.

use evaedn::foundation::{Primitive, Symbol, new_primitive_element};
use evaedn::{Element, ElementType, ErrorKind, Pair, parse, parse_collection};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn valid_tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,8}(/[a-z][a-z0-9_-]{0,8})?"
        .prop_filter("reserved names", |s| {
            !matches!(s.as_str(), "nil" | "true" | "false" | "inst" | "uuid")
        })
}

fn symbol_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9*!?_-]{0,6}",
        "[a-z]{1,4}/[a-z]{1,4}",
        "[-+.][a-z0-9]{0,3}",
        "[0-9][a-z]{1,3}",
        "[a-z]{1,3}/[a-z]{1,3}/[a-z]{1,3}",
    ]
}

fn string_key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Setting a tag and clearing it again restores the untagged element.
    #[test]
    fn tag_set_then_clear(tag in valid_tag(), n in any::<i64>()) {
        let mut element = Element::integer(n);
        element.set_tag(&tag).unwrap();
        prop_assert_eq!(element.tag(), tag.as_str());
        element.set_tag("").unwrap();
        prop_assert!(!element.has_tag());
        prop_assert_eq!(element, Element::integer(n));
    }

    /// A tag survives serialization and reading.
    #[test]
    fn tag_survives_reading(tag in valid_tag(), text in "[a-z ]{0,10}") {
        let element = Element::string(text).with_tag(&tag).unwrap();
        let read = parse(&element.to_string()).unwrap();
        prop_assert_eq!(read.tag(), tag.as_str());
    }

    /// Two string keys with the same text always collide, whatever the values.
    #[test]
    fn duplicate_string_keys_collide(key in string_key(), a in any::<i64>(), b in any::<i64>()) {
        let err = Element::map([
            Pair::new(Element::string(key.clone()), Element::integer(a)),
            Pair::new(Element::string(key.clone()), Element::integer(b)),
        ])
        .unwrap_err();
        prop_assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));

        let source = format!("{{\"{key}\" {a} \"{key}\" {b}}}");
        let err = parse(&source).unwrap_err();
        prop_assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));
    }

    /// Whatever the reader builds as a symbol, the symbol grammar builds too,
    /// and text the reader rejects is never a valid symbol.
    #[test]
    fn reader_agrees_with_symbol_grammar(text in symbol_like()) {
        let direct = Symbol::new(&text);
        match parse(&text) {
            Ok(element) if element.element_type() == ElementType::Symbol => {
                prop_assert_eq!(element.as_symbol(), direct.as_ref().ok());
            }
            Ok(_) => {}
            Err(_) => prop_assert!(direct.is_err(), "{} is a symbol but was not read", text),
        }
    }

    /// Native values convert, serialize and read back unchanged.
    #[test]
    fn native_values_roundtrip(n in any::<i32>(), flag in any::<bool>(), s in "[a-z]{0,8}") {
        for value in [Primitive::from(n), Primitive::from(flag), Primitive::from(s.as_str())] {
            let element = new_primitive_element(value).unwrap();
            prop_assert_eq!(parse(&element.to_string()).unwrap(), element);
        }
    }

    /// Unbalanced collections never parse.
    #[test]
    fn unbalanced_collections_rejected(depth in 1usize..20) {
        let open = "[".repeat(depth);
        prop_assert!(parse(&open).is_err());
        let close = format!("{}{}", open, "]".repeat(depth + 1));
        prop_assert!(parse(&close).is_err());
    }
}

// =============================================================================
// Fixed Properties
// =============================================================================

#[test]
fn invalid_tag_keeps_previous() {
    let mut element = Element::integer(1).with_tag("first").unwrap();
    for bad in ["1bad", "bad/worse/wrong", ":kw"] {
        assert!(element.set_tag(bad).is_err(), "{bad}");
        assert_eq!(element.tag(), "first");
    }
}

#[test]
fn keyed_lookup_after_reading() {
    let map = parse_collection("{\"a\" 1 :b 2 c 3}").unwrap();
    let map = map.as_collection().unwrap();
    assert_eq!(map.get(&Element::string("a")).unwrap().as_int(), Some(1));
    assert_eq!(map.get(&Element::keyword(":b").unwrap()).unwrap().as_int(), Some(2));
    assert_eq!(map.get(&Element::symbol("c").unwrap()).unwrap().as_int(), Some(3));
}

#[test]
fn set_members_key_themselves() {
    let set = parse("#{:a \"a\" 1}").unwrap();
    let set = set.as_collection().unwrap();
    for member in set.values() {
        assert_eq!(set.get(member).unwrap(), member);
    }
}

#[test]
fn malformed_inputs_fail() {
    for source in ["", ";comment only", "[ foo", "{:foo}", "(1 2]", "#{1 1}", "#tag"] {
        assert!(parse(source).is_err(), "{source:?} should fail");
    }
}
