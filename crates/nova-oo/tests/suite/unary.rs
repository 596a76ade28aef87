use nova_oo::{ArityPolicy, Expression, OoResolver, Operand, PrefixExpr};
use nova_types::{MethodDef, Type, NO_TYPE};

use pretty_assertions::assert_eq;

use super::fixtures::{CountingEnv, Fixture};

fn prefix(op: &str, operand: Option<Operand>) -> PrefixExpr {
    PrefixExpr {
        op: op.to_string(),
        operand,
    }
}

#[test]
fn negate_and_not_on_big_integer() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let big = fx.jdk("java.math.BigInteger");

    let operand = Some(Operand::typed("a", big.clone()));
    assert_eq!(oo.unary_operator_type(&prefix("-", operand.clone())), big);
    assert_eq!(oo.unary_operator_type(&prefix("~", operand)), big);
}

#[test]
fn big_decimal_has_no_bitwise_not() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let decimal = fx.jdk("java.math.BigDecimal");

    let operand = Some(Operand::typed("d", decimal.clone()));
    assert_eq!(oo.unary_operator_type(&prefix("-", operand.clone())), decimal);
    assert_eq!(oo.unary_operator_type(&prefix("~", operand)), NO_TYPE);
}

#[test]
fn unmapped_or_missing_operand_is_unresolved() {
    let fx = Fixture::new();
    let env = CountingEnv::new(&fx.env);
    let oo = OoResolver::new(&env);
    let big = fx.jdk("java.math.BigInteger");

    assert_eq!(
        oo.unary_operator_type(&prefix("+", Some(Operand::typed("a", big.clone())))),
        NO_TYPE
    );
    assert_eq!(
        oo.unary_operator_type(&prefix("!", Some(Operand::typed("a", big)))),
        NO_TYPE
    );
    assert_eq!(oo.unary_operator_type(&prefix("-", None)), NO_TYPE);
    assert!(env.lookups().is_empty(), "{:?}", env.lookups());
}

#[test]
fn unary_is_a_zero_argument_call() {
    let mut fx = Fixture::new();
    let money = fx.ty(fx.money);
    let wallet = fx.add(
        "com.example.Wallet",
        vec![
            MethodDef::new("negate", vec![], money.clone()),
            MethodDef::new("not", vec![Type::int()], Type::boolean()),
        ],
    );
    let oo = OoResolver::new(&fx.env);
    let operand = Some(Operand::typed("w", fx.ty(wallet)));

    assert_eq!(oo.unary_operator_type(&prefix("-", operand.clone())), money);
    // `not(int)` needs an argument, so `~w` has no candidate.
    assert_eq!(oo.unary_operator_type(&prefix("~", operand)), NO_TYPE);
}

#[test]
fn unary_skips_candidates_with_parameters_under_prefix_arity() {
    let mut fx = Fixture::new();
    let flags = fx.add(
        "com.example.Flags",
        vec![
            MethodDef::new("not", vec![Type::int()], Type::boolean()),
            MethodDef::new("not", vec![], Type::int()),
        ],
    );
    let oo = OoResolver::new(&fx.env);
    let f = fx.ty(flags);

    assert_eq!(oo.methods().config().arity, ArityPolicy::Prefix);
    assert_eq!(
        oo.unary_operator_type(&prefix("~", Some(Operand::typed("f", f.clone())))),
        Type::int()
    );
    // Plain method resolution still accepts the longer parameter list.
    assert_eq!(oo.resolve_method(&f, "not", &[]), Some(Type::boolean()));
}

#[test]
fn repeated_unary_queries_agree() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);
    let expr = prefix(
        "-",
        Some(Operand::typed("a", fx.jdk("java.math.BigInteger"))),
    );

    let first = oo.unary_operator_type(&expr);
    assert_eq!(first, fx.jdk("java.math.BigInteger"));
    assert_eq!(oo.unary_operator_type(&expr), first);
}

#[test]
fn primitive_operands_are_left_to_the_host() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);

    assert_eq!(
        oo.unary_operator_type(&prefix("-", Some(Operand::typed("1", Type::int())))),
        NO_TYPE
    );
}

#[test]
fn untyped_operand_without_typer_is_unresolved() {
    let fx = Fixture::new();
    let oo = OoResolver::new(&fx.env);

    let expr = Expression::Prefix(prefix("-", Some(Operand::untyped("a"))));
    assert_eq!(oo.expression_type(&expr), NO_TYPE);
}
