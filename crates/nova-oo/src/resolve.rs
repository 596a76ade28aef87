use std::fmt;

use nova_types::{
    canonicalize_named, class_substitution, format_type, substitute, ClassType, Span, Type,
    TypeEnv,
};

use crate::config::{ArityPolicy, ResolutionConfig};
use crate::expr::{synthesize_call, ExprTyper, Operand};
use crate::LOG_TARGET;

/// How a method is being invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// `receiver.m(..)`: static and instance methods are both applicable.
    Instance,
    /// `Type.m(..)`: only static methods are applicable.
    Static,
}

/// First-match method resolution against a declaration snapshot.
///
/// This is not Java's most-specific overload selection: candidates are tried in the order the
/// [`TypeEnv`] reports them and the first applicable one wins.
#[derive(Clone, Copy)]
pub struct MethodResolver<'a> {
    env: &'a dyn TypeEnv,
    typer: Option<&'a dyn ExprTyper>,
    config: ResolutionConfig,
}

impl fmt::Debug for MethodResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodResolver")
            .field("has_typer", &self.typer.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> MethodResolver<'a> {
    pub fn new(env: &'a dyn TypeEnv) -> Self {
        Self {
            env,
            typer: None,
            config: ResolutionConfig::default(),
        }
    }

    pub fn with_typer(mut self, typer: &'a dyn ExprTyper) -> Self {
        self.typer = Some(typer);
        self
    }

    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn env(&self) -> &'a dyn TypeEnv {
        self.env
    }

    pub fn config(&self) -> ResolutionConfig {
        self.config
    }

    /// Resolve `receiver.method(args..)` and return the receiver-substituted return type.
    ///
    /// Returns `None` when the receiver is not class-shaped, the method name is empty, any
    /// argument is [`Type::Unknown`], or no candidate both accepts the arguments and has a return
    /// type that resolves under the receiver's type arguments.
    pub fn resolve_method(&self, receiver: &Type, method: &str, args: &[Type]) -> Option<Type> {
        self.resolve_call(receiver, CallKind::Instance, method, args)
    }

    /// Resolve `Receiver.method(args..)` considering only static methods.
    pub fn resolve_static_method(
        &self,
        receiver: &Type,
        method: &str,
        args: &[Type],
    ) -> Option<Type> {
        self.resolve_call(receiver, CallKind::Static, method, args)
    }

    pub fn resolve_call(
        &self,
        receiver: &Type,
        kind: CallKind,
        method: &str,
        args: &[Type],
    ) -> Option<Type> {
        if method.is_empty() {
            return None;
        }
        let receiver = canonicalize_named(self.env, receiver);
        let Type::Class(ClassType {
            def,
            args: type_args,
        }) = &receiver
        else {
            tracing::trace!(
                target: LOG_TARGET,
                method,
                "receiver is not a class type"
            );
            return None;
        };
        if args.iter().any(Type::is_unknown) {
            tracing::trace!(
                target: LOG_TARGET,
                method,
                "unresolved argument type; skipping resolution"
            );
            return None;
        }
        let class_def = self.env.class(*def)?;
        let subst = class_substitution(self.env, class_def, type_args);

        for candidate in self.env.methods_named(*def, method) {
            if kind == CallKind::Static && !candidate.is_static {
                continue;
            }
            if args.len() > candidate.params.len() {
                tracing::trace!(
                    target: LOG_TARGET,
                    method,
                    params = candidate.params.len(),
                    args = args.len(),
                    "candidate has fewer parameters than arguments"
                );
                continue;
            }
            if self.config.arity == ArityPolicy::Exact && args.len() != candidate.params.len() {
                continue;
            }

            let applicable = args.iter().zip(&candidate.params).all(|(arg, param)| {
                self.env.is_assignable(arg, &substitute(param, &subst))
            });
            if applicable {
                let ty = substitute(&candidate.return_type, &subst);
                if ty.is_unknown() {
                    // e.g. `Pair<Money>` against `Pair<A, B>`: `B` has no argument.
                    tracing::trace!(
                        target: LOG_TARGET,
                        method,
                        "candidate return type is unresolved; trying the next candidate"
                    );
                    continue;
                }
                tracing::debug!(
                    target: LOG_TARGET,
                    receiver = %format_type(self.env, &receiver),
                    method,
                    result = %format_type(self.env, &ty),
                    "resolved operator method"
                );
                return Some(ty);
            }
        }

        None
    }

    /// Resolve a call whose receiver and arguments are host expressions.
    ///
    /// Typed receivers go through [`MethodResolver::resolve_method`]; an untyped argument is then
    /// the "no type" sentinel and poisons the call. Untyped receivers fall back to typing the
    /// synthesized call text with the installed [`ExprTyper`].
    pub fn resolve_method_expr(
        &self,
        receiver: &Operand,
        method: &str,
        args: &[&Operand],
    ) -> Option<Type> {
        if let Some(receiver_ty) = receiver.resolved_type() {
            let arg_types: Vec<Type> = args.iter().map(|arg| arg.type_or_unknown()).collect();
            return self.resolve_method(receiver_ty, method, &arg_types);
        }
        self.resolve_method_text(&receiver.text, receiver.span, method, args)
    }

    /// Type `receiver_text.method(args..)` through the host's [`ExprTyper`].
    pub fn resolve_method_text(
        &self,
        receiver_text: &str,
        at: Option<Span>,
        method: &str,
        args: &[&Operand],
    ) -> Option<Type> {
        if method.is_empty() || receiver_text.trim().is_empty() || !self.config.text_fallback {
            return None;
        }
        let typer = self.typer?;
        let text = synthesize_call(receiver_text, method, args);
        let ty = typer.type_of_text(&text, at).filter(|ty| !ty.is_unknown());
        tracing::debug!(
            target: LOG_TARGET,
            text = %text,
            resolved = ty.is_some(),
            "typed synthesized call"
        );
        ty
    }
}
