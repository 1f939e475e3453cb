//! Integration tests for native declarations.

use rill_typecheck::error::SignatureFault;
use rill_typecheck::{infer, LiteralKind, Natives, Signature, Tree, Ty, TypeError};
use std::error::Error;

#[test]
fn test_signature_display_is_parseable() {
    for text in [
        "number",
        "a -> a",
        "a -> a -> list(a)",
        "(a -> b) -> list(a) -> list(b)",
        "step(list(a)) -> event(function(a, text))",
    ] {
        let sig = Signature::parse(text).unwrap();
        assert_eq!(sig.to_string(), text);
        assert_eq!(Signature::parse(&sig.to_string()).unwrap(), sig);
    }
}

#[test]
fn test_declare_rejects_bad_syntax() {
    let mut natives = Natives::new();

    let err = natives.declare("hold", "a -> event(a").unwrap_err();
    match err {
        TypeError::MalformedSignature {
            native,
            cause: SignatureFault::Syntax { offset, .. },
        } => {
            assert_eq!(native, "hold");
            assert_eq!(offset, 12);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
    assert!(natives.get("hold").is_none());
}

#[test]
fn test_malformed_native_fails_before_traversal() {
    let mut natives = Natives::new();
    natives.declare("identity", "a -> a").unwrap();
    natives.declare("lookup", "map(text, a) -> a").unwrap();

    // The tree itself is fine and never mentions `lookup`.
    let mut tree = Tree::new();
    let one = tree.literal(LiteralKind::Number);
    let root = tree.apply("identity", vec![one]);

    let err = infer(&natives, &tree, root).unwrap_err();
    assert_eq!(err.node, None);
    assert_eq!(
        err.error,
        TypeError::MalformedSignature {
            native: "lookup".to_string(),
            cause: SignatureFault::Kind(Box::new(TypeError::UnknownConstructor {
                name: "map".to_string(),
            })),
        }
    );
    assert!(err.error.source().is_some());
    assert_eq!(
        err.to_string(),
        "malformed signature for native `lookup`: unknown type constructor: map"
    );
}

#[test]
fn test_validate() {
    let mut natives = Natives::new();
    natives.declare("hold", "a -> event(a) -> step(a)").unwrap();
    assert!(natives.validate().is_ok());

    natives.insert("broken", Signature::app("list", vec![]));
    assert!(matches!(
        natives.validate(),
        Err(TypeError::MalformedSignature { ref native, .. }) if native == "broken"
    ));
}

#[test]
fn test_registered_names_are_not_variables() {
    let mut natives = Natives::new();
    natives.declare("to_text", "number -> text").unwrap();
    natives.declare("anything", "number_ -> text_").unwrap();

    let mut tree = Tree::new();
    let label = tree.literal(LiteralKind::Text);
    let root = tree.apply("to_text", vec![label]);
    assert!(infer(&natives, &tree, root).is_err());

    // `number_` is not a constructor, so it is a variable.
    let mut tree = Tree::new();
    let label = tree.literal(LiteralKind::Text);
    let root = tree.apply("anything", vec![label]);
    let typing = infer(&natives, &tree, root).unwrap();
    assert!(!typing.root_type().is_ground());
}

#[test]
fn test_redeclared_native_is_used() {
    let mut natives = Natives::new();
    natives.declare("now", "step(number)").unwrap();
    natives.declare("now", "step(bytes)").unwrap();

    let mut tree = Tree::new();
    let root = tree.reference("now");
    let typing = infer(&natives, &tree, root).unwrap();
    assert_eq!(typing.root_type(), &Ty::step(Ty::bytes()));
}

#[test]
fn test_explicit_function_constructor() {
    let mut natives = Natives::new();
    natives.declare("apply", "function(a, b) -> a -> b").unwrap();
    natives.declare("not", "boolean -> boolean").unwrap();

    let mut tree = Tree::new();
    let f = tree.reference("not");
    let arg = tree.literal(LiteralKind::Boolean);
    let root = tree.apply("apply", vec![f, arg]);

    let typing = infer(&natives, &tree, root).unwrap();
    assert_eq!(typing.root_type(), &Ty::boolean());
}
