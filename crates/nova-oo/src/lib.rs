//! Operator-overload type inference for Java value objects.
//!
//! Given a class that follows the `java.math.BigInteger` naming conventions (`add`, `subtract`,
//! `negate`, `get`/`set`, `valueOf`, ...), [`OoResolver`] answers what type an operator
//! expression such as `a + b`, `-a`, `m[i]`, `m[i] = v` produces, and whether a value converts to
//! a target type through a static factory. It never executes code: answers come from the
//! declarations exposed by a [`nova_types::TypeEnv`].
//!
//! ```
//! use nova_oo::OoResolver;
//! use nova_types::{Type, TypeStore, NO_TYPE};
//!
//! let env = TypeStore::with_minimal_jdk();
//! let big = Type::class(env.class_id("java.math.BigInteger").unwrap(), vec![]);
//! let oo = OoResolver::new(&env);
//!
//! assert_eq!(oo.binary_operator_type(&big, Some(&big), "+"), big);
//! assert_eq!(oo.binary_operator_type(&big, Some(&big), "**"), NO_TYPE);
//! ```
//!
//! Resolution is first-match: method candidates are tried in declaration order (own methods
//! before inherited ones) and the first whose parameters accept the arguments wins.

#![forbid(unsafe_code)]

pub mod config;
pub mod expr;
mod infer;
mod operators;
mod resolve;

pub use config::{json_schema, ArityPolicy, ConfigError, OoConfig, ResolutionConfig};
pub use expr::{BinaryExpr, ExprTyper, Expression, IndexExpr, Operand, PrefixExpr};
pub use infer::OoResolver;
pub use operators::OperatorTable;
pub use resolve::{CallKind, MethodResolver};

/// Tracing target for resolution events.
pub const LOG_TARGET: &str = "nova.oo";
