use nova_oo::{Expression, IndexExpr, OoResolver, Operand};
use nova_types::{MethodDef, Type, NO_TYPE};

use pretty_assertions::assert_eq;

use super::fixtures::{CountingEnv, Fixture};

fn index(base: Operand, index: Option<Operand>, value: Option<Operand>) -> IndexExpr {
    IndexExpr { base, index, value }
}

#[test]
fn money_index_get_is_money() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let money = fx.ty(fx.money);

    let expr = index(
        Operand::typed("m", money.clone()),
        Some(Operand::typed("0", Type::int())),
        None,
    );
    assert_eq!(oo.index_get_type(&expr), money);
    assert_eq!(oo.expression_type(&Expression::Index(expr)), money);
}

#[test]
fn list_get_substitutes_type_arguments() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let array_list = fx.env.class_id("java.util.ArrayList").unwrap();
    let list_of_string = Type::class(array_list, vec![fx.string()]);

    let expr = index(
        Operand::typed("xs", list_of_string),
        Some(Operand::typed("i", Type::int())),
        None,
    );
    assert_eq!(oo.index_get_type(&expr), fx.string());

    let wrong_index = index(
        expr.base.clone(),
        Some(Operand::typed("s", fx.string())),
        None,
    );
    assert_eq!(oo.index_get_type(&wrong_index), NO_TYPE);
}

#[test]
fn generic_value_object_substitution() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let money = fx.ty(fx.money);
    let i = Some(Operand::typed("0", Type::int()));

    let box_of_money = Type::class(fx.boxed, vec![money.clone()]);
    let expr = index(Operand::typed("b", box_of_money), i.clone(), None);
    assert_eq!(oo.index_get_type(&expr), money);

    // Raw `Box` erases `T` to its bound.
    let raw = index(Operand::typed("b", fx.ty(fx.boxed)), i, None);
    assert_eq!(
        oo.index_get_type(&raw),
        Type::class(fx.env.class_id("java.lang.Object").unwrap(), vec![])
    );
}

#[test]
fn missing_index_is_unresolved() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);

    let expr = index(Operand::typed("m", fx.ty(fx.money)), None, None);
    assert_eq!(oo.index_get_type(&expr), NO_TYPE);
    assert_eq!(oo.index_set_type(&expr), NO_TYPE);
}

#[test]
fn index_set_prefers_set_over_put() {
    let fx = Fixture::new();
    let env = CountingEnv::new(&fx.env);
    let oo = OoResolver::new(&env);
    let list = fx.env.class_id("java.util.List").unwrap();
    let list_of_string = Type::class(list, vec![fx.string()]);

    let expr = index(
        Operand::typed("xs", list_of_string),
        Some(Operand::typed("0", Type::int())),
        Some(Operand::typed("\"x\"", fx.string())),
    );
    assert_eq!(oo.index_set_type(&expr), fx.string());
    assert_eq!(env.lookups(), vec!["set".to_string()]);
}

#[test]
fn index_set_falls_back_to_second_name() {
    let fx = Fixture::new();
    let env = CountingEnv::new(&fx.env);
    let oo = OoResolver::new(&env);
    let hash_map = fx.env.class_id("java.util.HashMap").unwrap();
    let integer = fx.jdk("java.lang.Integer");
    let map = Type::class(hash_map, vec![fx.string(), integer.clone()]);

    // `map["k"] = 1` is `map.put("k", 1)`; `int` boxes to `Integer`.
    let expr = index(
        Operand::typed("map", map),
        Some(Operand::typed("\"k\"", fx.string())),
        Some(Operand::typed("1", Type::int())),
    );
    assert_eq!(oo.index_set_type(&expr), integer);
    assert_eq!(oo.expression_type(&Expression::Index(expr)), integer);
    assert_eq!(
        env.lookups(),
        vec![
            "set".to_string(),
            "put".to_string(),
            "set".to_string(),
            "put".to_string()
        ]
    );
}

#[test]
fn index_set_resolves_the_only_declared_candidate() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let ledger = fx.add(
        "com.example.Ledger",
        vec![MethodDef::new(
            "put",
            vec![Type::int(), money.clone()],
            Type::Void,
        )],
    );
    let oo = OoResolver::new(&fx.env);

    let expr = index(
        Operand::typed("ledger", fx.ty(ledger)),
        Some(Operand::typed("3", Type::int())),
        Some(Operand::typed("m", money)),
    );
    assert_eq!(oo.index_set_type(&expr), Type::Void);
}

#[test]
fn repeated_index_set_queries_agree() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let hash_map = fx.env.class_id("java.util.HashMap").unwrap();
    let integer = fx.jdk("java.lang.Integer");
    let map = Type::class(hash_map, vec![fx.string(), integer.clone()]);

    let expr = index(
        Operand::typed("map", map),
        Some(Operand::typed("\"k\"", fx.string())),
        Some(Operand::typed("1", Type::int())),
    );
    let first = oo.index_set_type(&expr);
    assert_eq!(first, integer);
    assert_eq!(oo.index_set_type(&expr), first);
}

#[test]
fn index_set_without_value_is_unresolved() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let list = fx.env.class_id("java.util.List").unwrap();

    let expr = index(
        Operand::typed("xs", Type::class(list, vec![fx.string()])),
        Some(Operand::typed("0", Type::int())),
        None,
    );
    assert_eq!(oo.index_set_type(&expr), NO_TYPE);
    assert_eq!(
        oo.index_set_type(&IndexExpr {
            value: Some(Operand::untyped("v")),
            ..expr
        }),
        NO_TYPE
    );
}

#[test]
fn arrays_are_left_to_the_host() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);

    let expr = index(
        Operand::typed("xs", Type::array(Type::int())),
        Some(Operand::typed("0", Type::int())),
        None,
    );
    assert_eq!(oo.index_get_type(&expr), NO_TYPE);
}
