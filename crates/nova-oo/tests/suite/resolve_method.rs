use nova_oo::{ArityPolicy, CallKind, MethodResolver, OoResolver, ResolutionConfig};
use nova_types::{ClassDef, ClassKind, MethodDef, Type};

use pretty_assertions::assert_eq;

use super::fixtures::{CountingEnv, Fixture};

#[test]
fn unresolved_arguments_poison_the_call() {
    let fx = Fixture::new();
    let env = CountingEnv::new(&fx.env);
    let resolver = MethodResolver::new(&env);
    let money = fx.ty(fx.money);

    assert_eq!(
        resolver.resolve_method(&money, "plus", &[Type::Unknown]),
        None
    );
    assert_eq!(
        resolver.resolve_method(&money, "plus", &[money.clone(), Type::Unknown]),
        None
    );
    assert!(env.lookups().is_empty(), "{:?}", env.lookups());
}

#[test]
fn non_class_receivers_and_empty_names_do_not_match() {
    let fx = Fixture::new();
    let resolver = MethodResolver::new(&fx.env);
    let money = fx.ty(fx.money);

    for receiver in [
        Type::int(),
        Type::array(money.clone()),
        Type::Null,
        Type::Void,
        Type::Unknown,
        Type::named("com.example.Missing"),
    ] {
        assert_eq!(
            resolver.resolve_method(&receiver, "plus", &[money.clone()]),
            None,
            "{receiver:?}"
        );
    }
    assert_eq!(resolver.resolve_method(&money, "", &[money.clone()]), None);
    assert_eq!(resolver.resolve_method(&money, "Plus", &[money.clone()]), None);
}

#[test]
fn candidates_with_fewer_parameters_are_skipped() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let pair = fx.add(
        "com.example.Pair",
        vec![
            MethodDef::new("combine", vec![money.clone()], money.clone()),
            MethodDef::new("combine", vec![money.clone(), money.clone()], Type::int()),
        ],
    );
    let resolver = MethodResolver::new(&fx.env);
    let pair = fx.ty(pair);

    assert_eq!(
        resolver.resolve_method(&pair, "combine", &[money.clone(), money.clone()]),
        Some(Type::int())
    );
    assert_eq!(
        resolver.resolve_method(&pair, "combine", &[money.clone(), money.clone(), money]),
        None
    );
}

#[test]
fn arity_policy_controls_trailing_parameters() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let scaler = fx.add(
        "com.example.Scaler",
        vec![MethodDef::new(
            "scale",
            vec![Type::int(), Type::int()],
            money.clone(),
        )],
    );
    let scaler = fx.ty(scaler);

    let prefix = MethodResolver::new(&fx.env);
    assert_eq!(
        prefix.resolve_method(&scaler, "scale", &[Type::int()]),
        Some(money.clone())
    );

    let exact = MethodResolver::new(&fx.env).with_config(ResolutionConfig {
        arity: ArityPolicy::Exact,
        ..ResolutionConfig::default()
    });
    assert_eq!(exact.resolve_method(&scaler, "scale", &[Type::int()]), None);
    assert_eq!(
        exact.resolve_method(&scaler, "scale", &[Type::int(), Type::int()]),
        Some(money)
    );
}

#[test]
fn first_applicable_candidate_wins_over_more_specific_ones() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let object = Type::class(fx.env.class_id("java.lang.Object").unwrap(), vec![]);
    let string = fx.string();
    let mixer = fx.add(
        "com.example.Mixer",
        vec![
            MethodDef::new("mix", vec![object], string.clone()),
            MethodDef::new("mix", vec![money.clone()], money.clone()),
        ],
    );

    let resolver = MethodResolver::new(&fx.env);
    assert_eq!(
        resolver.resolve_method(&fx.ty(mixer), "mix", &[money]),
        Some(string)
    );
}

#[test]
fn inherited_methods_resolve_on_subclasses() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let euro = fx.env.add_class(ClassDef {
        name: "com.example.Euro".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(money.clone()),
        interfaces: vec![],
        methods: vec![],
    });
    let euro = fx.ty(euro);
    let oo = OoResolver::new(&fx.env);

    // `Euro` is a `Money`, so it is also accepted as the argument.
    assert_eq!(
        oo.resolve_method(&euro, "plus", &[euro.clone()]),
        Some(money.clone())
    );
    assert_eq!(oo.resolve_method(&euro, "get", &[Type::int()]), Some(money));
}

#[test]
fn arguments_unbox_and_widen() {
    let fx = Fixture::new();
    let resolver = MethodResolver::new(&fx.env);
    let big = fx.jdk("java.math.BigInteger");
    let integer = fx.jdk("java.lang.Integer");

    assert_eq!(
        resolver.resolve_method(&big, "shiftLeft", &[integer]),
        Some(big.clone())
    );
    assert_eq!(
        resolver.resolve_method(
            &big,
            "shiftLeft",
            &[Type::Primitive(nova_types::PrimitiveType::Short)]
        ),
        Some(big.clone())
    );
    assert_eq!(resolver.resolve_method(&big, "shiftLeft", &[Type::long()]), None);
    assert_eq!(
        resolver.resolve_method(&big, "add", &[Type::Null]),
        Some(big)
    );
}

#[test]
fn named_receivers_are_canonicalized() {
    let fx = Fixture::new();
    let resolver = MethodResolver::new(&fx.env);
    let big = fx.jdk("java.math.BigInteger");

    assert_eq!(
        resolver.resolve_method(&Type::named("java.math.BigInteger"), "negate", &[]),
        Some(big)
    );
    assert_eq!(
        resolver.resolve_method(&Type::named("Integer"), "compareTo", &[Type::int()]),
        Some(Type::int())
    );
}

#[test]
fn static_calls_only_see_static_methods() {
    let fx = Fixture::new();
    let resolver = MethodResolver::new(&fx.env);
    let big = fx.jdk("java.math.BigInteger");

    assert_eq!(
        resolver.resolve_call(&big, CallKind::Static, "valueOf", &[Type::long()]),
        Some(big.clone())
    );
    assert_eq!(
        resolver.resolve_static_method(&big, "negate", &[]),
        None
    );
    // Static methods stay callable through an instance receiver.
    assert_eq!(
        resolver.resolve_method(&big, "valueOf", &[Type::long()]),
        Some(big)
    );
}

#[test]
fn generic_receiver_substitutes_inherited_signatures() {
    let fx = Fixture::new();
    let resolver = MethodResolver::new(&fx.env);
    let hash_map = fx.env.class_id("java.util.HashMap").unwrap();
    let money = fx.ty(fx.money);
    let map = Type::class(hash_map, vec![fx.string(), money.clone()]);

    assert_eq!(
        resolver.resolve_method(&map, "get", &[fx.string()]),
        Some(money.clone())
    );
    assert_eq!(
        resolver.resolve_method(&map, "put", &[fx.string(), money.clone()]),
        Some(money.clone())
    );
    // Type arguments are invariant: a `String` value is not a `Money`.
    assert_eq!(
        resolver.resolve_method(&map, "put", &[fx.string(), fx.string()]),
        None
    );
}
