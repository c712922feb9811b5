//! Integration tests for the type and serializer registries
//!
//! Tests stereotyping of native values, element factories and MIME type
//! resolution.

use std::any::Any;

use chrono::{TimeZone, Utc};
use evaedn_foundation::registry::ElementFactory;
use evaedn_foundation::serializer::SerializerFactory;
use evaedn_foundation::{
    EVA_EDN_MIME_TYPE, EdnSerializer, Element, ElementType, ErrorKind, MimeType, Primitive,
    Serializer, SerializerRegistry, TypeRegistry, get_serializer, is_primitive,
    new_primitive_element, stereotype,
};
use uuid::Uuid;

// =============================================================================
// Stereotypes
// =============================================================================

#[test]
fn stereotype_classifies_natives() {
    let cases: Vec<(Primitive, ElementType)> = vec![
        (Primitive::from(true), ElementType::Boolean),
        (Primitive::from(7u8), ElementType::Integer),
        (Primitive::from(-7i32), ElementType::Integer),
        (Primitive::from(1.5f32), ElementType::Float),
        (Primitive::from('c'), ElementType::Character),
        (Primitive::from("text"), ElementType::String),
        (Primitive::from(":kw"), ElementType::Keyword),
        (Primitive::from(Uuid::nil()), ElementType::Uuid),
        (
            Primitive::from(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()),
            ElementType::Instant,
        ),
    ];
    for (value, expected) in cases {
        let (_, ty) = stereotype(value.clone()).unwrap();
        assert_eq!(ty, expected, "{value:?}");
    }
}

#[test]
fn nil_text_stereotypes_as_nil() {
    let (value, ty) = stereotype(Primitive::from("nil")).unwrap();
    assert_eq!(ty, ElementType::Nil);
    assert_eq!(value, Primitive::Nil);
    assert_eq!(stereotype(Primitive::from(None::<i32>)).unwrap().1, ElementType::Nil);
}

#[test]
fn elements_have_no_stereotype() {
    let err = stereotype(Primitive::from(Element::integer(1))).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownMimeType(_)));
}

#[test]
fn from_any_downcasts() {
    let values: [Box<dyn Any>; 4] = [
        Box::new(42i16),
        Box::new(String::from("s")),
        Box::new(9u64),
        Box::new(Element::nil()),
    ];
    let converted: Vec<Primitive> = values
        .iter()
        .map(|v| Primitive::from_any(v.as_ref()).unwrap())
        .collect();
    assert_eq!(converted[0], Primitive::Int(42));
    assert_eq!(converted[1], Primitive::Str("s".into()));
    assert_eq!(converted[2], Primitive::Int(9));
    assert_eq!(converted[3], Primitive::Element(Element::nil()));
}

#[test]
fn from_any_rejects_overflow() {
    let err = Primitive::from_any(&u64::MAX).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));
}

#[test]
fn from_any_rejects_unsupported() {
    let err = Primitive::from_any(&vec![1u8]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownMimeType(_)));
    assert!(!is_primitive(&vec![1u8]));
    assert!(is_primitive(&1i64));
}

// =============================================================================
// Type Registry
// =============================================================================

#[test]
fn global_builds_elements() {
    assert_eq!(new_primitive_element(5).unwrap(), Element::integer(5));
    assert_eq!(new_primitive_element("nil").unwrap(), Element::nil());
    assert_eq!(
        new_primitive_element(":db/ident").unwrap(),
        Element::keyword(":db/ident").unwrap()
    );
    assert_eq!(new_primitive_element('x').unwrap(), Element::character('x'));
}

#[test]
fn elements_pass_through() {
    let element = Element::string("x").with_tag("t").unwrap();
    assert_eq!(new_primitive_element(element.clone()).unwrap(), element);
}

#[test]
fn invalid_keyword_text_fails() {
    let err = new_primitive_element(":1bad").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidKeyword(_)));
}

#[test]
fn empty_registry_has_no_factories() {
    let registry = TypeRegistry::new();
    assert!(!registry.contains(ElementType::Integer));
    let err = registry.new_element(1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidElement(_)));
}

#[test]
fn duplicate_factory_rejected() {
    let registry = TypeRegistry::with_defaults();
    let factory: ElementFactory = |_| Ok(Element::nil());
    let err = registry.register(ElementType::Integer, factory).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFactory(_)));
}

#[test]
fn custom_factory_is_used() {
    let registry = TypeRegistry::new();
    let factory: ElementFactory = |value| match value {
        Primitive::Int(n) => Ok(Element::integer(n * 2)),
        _ => Ok(Element::nil()),
    };
    registry.register(ElementType::Integer, factory).unwrap();
    assert!(registry.contains(ElementType::Integer));
    assert_eq!(registry.new_element(21).unwrap(), Element::integer(42));
}

#[test]
fn factory_rejects_wrong_shape() {
    let factory = TypeRegistry::global()
        .factory(ElementType::Boolean)
        .unwrap();
    let err = factory(Primitive::Int(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));
}

// =============================================================================
// Serializers
// =============================================================================

#[test]
fn mime_type_options() {
    let mime = MimeType::new("application/vnd.eva+edn;pretty,indent=2");
    assert_eq!(mime.mime_type(), EVA_EDN_MIME_TYPE);
    assert_eq!(mime.options("pretty"), Some(""));
    assert_eq!(mime.options("indent"), Some("2"));
    assert_eq!(mime.options("missing"), None);
    assert_eq!(MimeType::new(EVA_EDN_MIME_TYPE).options("pretty"), None);
}

#[test]
fn serializer_lookup_ignores_options() {
    let serializer = get_serializer("application/vnd.eva+edn;charset=utf-8").unwrap();
    assert_eq!(serializer.mime_type().mime_type(), EVA_EDN_MIME_TYPE);
    assert_eq!(serializer.mime_type().options("charset"), Some("utf-8"));
}

#[test]
fn unknown_format_rejected() {
    let err = get_serializer("application/json").err().unwrap();
    assert!(matches!(err.kind, ErrorKind::UnknownMimeType(_)));
    let err = Element::integer(1).serialize("text/plain").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownMimeType(_)));
}

#[test]
fn serialize_matches_display() {
    let element = Element::vector([Element::integer(1), Element::string("two")]);
    assert_eq!(
        element.serialize(EVA_EDN_MIME_TYPE).unwrap(),
        element.to_string()
    );
    let serializer = EdnSerializer::default();
    assert_eq!(element.serialize_with(&serializer).unwrap(), "[1 \"two\"]");
}

#[test]
fn isolated_serializer_registry() {
    let registry = SerializerRegistry::new();
    assert!(registry.get(EVA_EDN_MIME_TYPE).is_err());

    let factory: SerializerFactory = |mime| Box::new(EdnSerializer::new(mime));
    registry.register("text/edn", factory).unwrap();
    let serializer = registry.get("text/edn").unwrap();
    assert_eq!(serializer.encode(&Element::nil()).unwrap(), "nil");

    let err = registry.register("text/edn", factory).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFactory(_)));
}
