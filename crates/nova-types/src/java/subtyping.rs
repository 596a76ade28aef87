use std::collections::HashSet;

use crate::{ClassType, PrimitiveType, Type, TypeEnv, TypeVarId};

/// Java subtyping (JLS 4.10), restricted to the shapes this crate models.
///
/// Type arguments are compared invariantly; raw types are compatible with any instantiation
/// (unchecked conversion). `Unknown` is never a subtype of anything, including itself.
pub fn is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    let mut seen = HashSet::new();
    is_subtype_inner(env, sub, sup, &mut seen)
}

fn is_subtype_inner(
    env: &dyn TypeEnv,
    sub: &Type,
    sup: &Type,
    seen_type_vars: &mut HashSet<TypeVarId>,
) -> bool {
    if sub.is_unknown() || sup.is_unknown() {
        return false;
    }
    if sub == sup {
        return true;
    }

    let sub = crate::canonicalize_named(env, sub);
    let sup = crate::canonicalize_named(env, sup);
    if sub == sup {
        return true;
    }

    let object = env.well_known().object;
    if let Type::Class(ClassType { def, .. }) = &sup {
        if *def == object && sub.is_reference() {
            return true;
        }
    }

    match (&sub, &sup) {
        (Type::Null, other) => other.is_reference(),
        (Type::TypeVar(id), _) => {
            if !seen_type_vars.insert(*id) {
                return false;
            }
            let bounds = env
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default();
            let out = bounds
                .iter()
                .any(|bound| is_subtype_inner(env, bound, &sup, seen_type_vars));
            seen_type_vars.remove(id);
            out
        }
        (Type::Array(sub_elem), Type::Array(sup_elem)) => {
            if sub_elem.is_primitive() || sup_elem.is_primitive() {
                return sub_elem == sup_elem;
            }
            is_subtype_inner(env, sub_elem, sup_elem, seen_type_vars)
        }
        (Type::Array(_), Type::Class(ClassType { def, .. })) => {
            crate::instantiate_as_supertype(env, &sub, *def).is_some()
        }
        (Type::Class(_), Type::Class(ClassType { def, args })) => {
            let Some(Type::Class(found)) = crate::instantiate_as_supertype(env, &sub, *def) else {
                return false;
            };
            if args.is_empty() || found.args.is_empty() {
                return true;
            }
            found.args.len() == args.len()
                && found
                    .args
                    .iter()
                    .zip(args)
                    .all(|(a, b)| a == b || a.is_unknown() || b.is_unknown())
        }
        _ => false,
    }
}

/// Assignment compatibility (JLS 5.2) used for method argument checking: identity, widening
/// reference and primitive conversions, boxing and unboxing.
pub fn is_assignable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    if from.is_unknown() || to.is_unknown() {
        return false;
    }
    if matches!(from, Type::Void) || matches!(to, Type::Void) {
        return false;
    }
    if is_subtype(env, from, to) {
        return true;
    }

    match (from, to) {
        (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
        (Type::Primitive(prim), _) => {
            let Some(boxed) = env.lookup_class(prim.boxed_binary_name()) else {
                return false;
            };
            is_subtype(env, &Type::class(boxed, vec![]), to)
        }
        (_, Type::Primitive(target)) => match unboxed(env, from) {
            Some(prim) => prim == *target || prim.widens_to(*target),
            None => false,
        },
        _ => false,
    }
}

fn unboxed(env: &dyn TypeEnv, ty: &Type) -> Option<PrimitiveType> {
    let Type::Class(ClassType { def, .. }) = crate::canonicalize_named(env, ty) else {
        return None;
    };
    let class_def = env.class(def)?;
    PrimitiveType::from_boxed_binary_name(&class_def.name)
}
