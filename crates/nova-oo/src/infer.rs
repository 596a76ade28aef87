use std::slice;

use nova_types::{canonicalize_named, ClassType, Type, TypeEnv, NO_TYPE};

use crate::config::{ArityPolicy, OoConfig, ResolutionConfig};
use crate::expr::{BinaryExpr, ExprTyper, Expression, IndexExpr, Operand, PrefixExpr};
use crate::resolve::MethodResolver;
use crate::{OperatorTable, LOG_TARGET};

/// Static result types for operator-overload expressions.
///
/// Every query is a pure function of its inputs and the borrowed declaration snapshot; failures
/// are reported as [`NO_TYPE`] (or `false` for [`OoResolver::is_convertible`]) so hosts can fall
/// back to their own typing.
#[derive(Debug, Clone, Copy)]
pub struct OoResolver<'a> {
    table: &'a OperatorTable,
    methods: MethodResolver<'a>,
}

impl<'a> OoResolver<'a> {
    /// A resolver using the default Java-OO operator table.
    pub fn new(env: &'a dyn TypeEnv) -> Self {
        Self {
            table: OperatorTable::shared(),
            methods: MethodResolver::new(env),
        }
    }

    pub fn with_table(mut self, table: &'a OperatorTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_typer(mut self, typer: &'a dyn ExprTyper) -> Self {
        self.methods = self.methods.with_typer(typer);
        self
    }

    pub fn with_resolution(mut self, config: ResolutionConfig) -> Self {
        self.methods = self.methods.with_config(config);
        self
    }

    /// Apply the resolution settings of `config`; its operator table must be built separately
    /// (see [`OoConfig::table`]) since the resolver borrows it.
    pub fn with_config(self, config: &OoConfig) -> Self {
        self.with_resolution(config.resolution)
    }

    pub fn table(&self) -> &'a OperatorTable {
        self.table
    }

    pub fn methods(&self) -> &MethodResolver<'a> {
        &self.methods
    }

    /// Resolve `receiver.method(args..)`; see [`MethodResolver::resolve_method`].
    pub fn resolve_method(&self, receiver: &Type, method: &str, args: &[Type]) -> Option<Type> {
        self.methods.resolve_method(receiver, method, args)
    }

    /// Resolve a call on host expressions; see [`MethodResolver::resolve_method_expr`].
    pub fn resolve_method_expr(
        &self,
        receiver: &Operand,
        method: &str,
        args: &[&Operand],
    ) -> Option<Type> {
        self.methods.resolve_method_expr(receiver, method, args)
    }

    /// `left op right`: `left.m(right)`, falling back to `right.mRev(left)`.
    ///
    /// `right` is `None` when the expression has no right operand at all.
    pub fn binary_operator_type(&self, left: &Type, right: Option<&Type>, op: &str) -> Type {
        let Some(method) = self.table.binary_method(op) else {
            return NO_TYPE;
        };
        let Some(right) = right else {
            return NO_TYPE;
        };

        if let Some(ty) = self
            .methods
            .resolve_method(left, method, slice::from_ref(right))
        {
            return ty;
        }

        if let Some(reversed) = self.table.reversed_method(op) {
            tracing::trace!(
                target: LOG_TARGET,
                op,
                method = %reversed,
                "forward operator method did not resolve; trying reversed operands"
            );
            if let Some(ty) = self
                .methods
                .resolve_method(right, &reversed, slice::from_ref(left))
            {
                return ty;
            }
        }

        NO_TYPE
    }

    pub fn binary_expr_type(&self, expr: &BinaryExpr) -> Type {
        let Some(rhs) = &expr.rhs else {
            return NO_TYPE;
        };
        self.binary_operator_type(
            &expr.lhs.type_or_unknown(),
            Some(&rhs.type_or_unknown()),
            &expr.op,
        )
    }

    /// `op operand` as the zero-argument call `operand.m()`.
    ///
    /// Only candidates without parameters apply, whatever the configured arity policy.
    pub fn unary_operator_type(&self, expr: &PrefixExpr) -> Type {
        let Some(operand) = &expr.operand else {
            return NO_TYPE;
        };
        let Some(method) = self.table.unary_method(&expr.op) else {
            return NO_TYPE;
        };
        let methods = self.methods.with_config(ResolutionConfig {
            arity: ArityPolicy::Exact,
            ..self.methods.config()
        });
        methods
            .resolve_method_expr(operand, method, &[])
            .unwrap_or(NO_TYPE)
    }

    /// `base[index]` as `base.get(index)`.
    pub fn index_get_type(&self, expr: &IndexExpr) -> Type {
        let Some(index) = &expr.index else {
            return NO_TYPE;
        };
        self.methods
            .resolve_method_expr(&expr.base, self.table.index_get_method(), &[index])
            .unwrap_or(NO_TYPE)
    }

    /// `base[index] = value` as the first of `base.set(index, value)`, `base.put(index, value)`
    /// that resolves.
    pub fn index_set_type(&self, expr: &IndexExpr) -> Type {
        let (Some(index), Some(value)) = (&expr.index, &expr.value) else {
            return NO_TYPE;
        };
        self.table
            .index_set_methods()
            .iter()
            .find_map(|method| {
                self.methods
                    .resolve_method_expr(&expr.base, method, &[index, value])
            })
            .unwrap_or(NO_TYPE)
    }

    /// Whether `source` converts to `target` through a factory declared on the target class,
    /// e.g. `BigInteger x = 1` via `BigInteger.valueOf(long)`.
    pub fn is_convertible(&self, target: &Type, source: Option<&Operand>) -> bool {
        let Some(source) = source else {
            return false;
        };
        let target = canonicalize_named(self.methods.env(), target);
        if !target.is_class_shaped() {
            return false;
        }

        self.table.conversion_methods().iter().any(|method| {
            let resolved = match source.resolved_type() {
                Some(source_ty) => self.methods.resolve_static_method(
                    &target,
                    method,
                    slice::from_ref(source_ty),
                ),
                None => match self.class_source_name(&target) {
                    Some(class_name) => self.methods.resolve_method_text(
                        &class_name,
                        source.span,
                        method,
                        &[source],
                    ),
                    None => None,
                },
            };
            resolved.is_some_and(|ty| !ty.is_unknown())
        })
    }

    /// Dispatch on the expression shape. Index expressions with a value are typed as assignments.
    pub fn expression_type(&self, expr: &Expression) -> Type {
        match expr {
            Expression::Binary(binary) => self.binary_expr_type(binary),
            Expression::Prefix(prefix) => self.unary_operator_type(prefix),
            Expression::Index(index) if index.value.is_some() => self.index_set_type(index),
            Expression::Index(index) => self.index_get_type(index),
        }
    }

    fn class_source_name(&self, target: &Type) -> Option<String> {
        match target {
            Type::Class(ClassType { def, .. }) => self
                .methods
                .env()
                .class(*def)
                .map(|class_def| class_def.name.replace('$', ".")),
            Type::Named(name) => Some(name.clone()),
            _ => None,
        }
    }
}
