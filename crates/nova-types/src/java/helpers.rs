use std::collections::{HashSet, VecDeque};

use crate::{ClassId, ClassKind, ClassType, MethodDef, Type, TypeEnv, TypeVarId};

/// Return `ty` viewed as `target` by walking the supertype graph and applying type argument
/// substitution along the way.
///
/// This is a best-effort helper used for IDE-style type recovery. It never panics: missing class
/// metadata simply returns `None`.
///
/// Example: `ArrayList<String>` instantiated as `List` returns `List<String>`.
pub fn instantiate_as_supertype(env: &dyn TypeEnv, ty: &Type, target: ClassId) -> Option<Type> {
    fn inner(
        env: &dyn TypeEnv,
        ty: &Type,
        target: ClassId,
        seen_type_vars: &mut HashSet<TypeVarId>,
    ) -> Option<Type> {
        match ty {
            Type::Array(_) => {
                let wk = env.well_known();
                if target == wk.object || target == wk.cloneable || target == wk.serializable {
                    return Some(Type::class(target, vec![]));
                }
                return None;
            }
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    return None;
                }
                let bounds = env
                    .type_param(*id)
                    .map(|tp| tp.upper_bounds.clone())
                    .unwrap_or_default();
                let out = if bounds.is_empty() {
                    inner(
                        env,
                        &Type::class(env.well_known().object, vec![]),
                        target,
                        seen_type_vars,
                    )
                } else {
                    bounds
                        .iter()
                        .find_map(|bound| inner(env, bound, target, seen_type_vars))
                };
                seen_type_vars.remove(id);
                return out;
            }
            _ => {}
        }

        let ty = crate::canonicalize_named(env, ty);
        let Type::Class(ClassType { def, args }) = ty else {
            return None;
        };

        let mut queue: VecDeque<Type> = VecDeque::new();
        let mut seen: HashSet<(ClassId, Vec<Type>)> = HashSet::new();
        queue.push_back(Type::class(def, args));

        while let Some(current) = queue.pop_front() {
            let Type::Class(ClassType { def, args }) = current.clone() else {
                continue;
            };
            if !seen.insert((def, args.clone())) {
                continue;
            }

            if def == target {
                return Some(current);
            }

            let Some(class_def) = env.class(def) else {
                continue;
            };

            // If the current instantiation is raw (e.g. `List` rather than `List<String>`), we can't
            // recover meaningful type arguments for supertypes. Preserve rawness when walking.
            let raw = args.is_empty() && !class_def.type_params.is_empty();
            if raw {
                for sup in direct_supertypes(env, def) {
                    if let Some(raw_sup) = raw_class_type(env, &sup) {
                        queue.push_back(raw_sup);
                    }
                }
                continue;
            }

            let subst = crate::class_substitution(env, class_def, &args);
            for sup in direct_supertypes(env, def) {
                let sup = crate::canonicalize_named(env, &crate::substitute(&sup, &subst));
                queue.push_back(sup);
            }
        }

        None
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, target, &mut seen_type_vars)
}

/// Collect every method named `name` visible on `class`, own declarations first and then
/// supertypes in breadth-first declaration order.
///
/// Inherited signatures are rewritten in terms of `class`'s own type parameters (e.g. a method
/// declared on `List<E>` seen through `ArrayList<T>` mentions `T`). A supertype method whose
/// substituted parameter list equals an already collected one is overridden and skipped.
pub fn flatten_methods(env: &dyn TypeEnv, class: ClassId, name: &str) -> Vec<MethodDef> {
    let Some(root) = env.class(class) else {
        return Vec::new();
    };
    let own_args = root
        .type_params
        .iter()
        .map(|tp| Type::TypeVar(*tp))
        .collect();

    let mut out: Vec<MethodDef> = Vec::new();
    let mut queue: VecDeque<Type> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(Type::class(class, own_args));

    while let Some(current) = queue.pop_front() {
        let Type::Class(ClassType { def, args }) = current else {
            continue;
        };
        // The first path to reach a class wins, which matches Java's single instantiation rule.
        if !seen.insert(def) {
            continue;
        }
        let Some(class_def) = env.class(def) else {
            continue;
        };

        let subst = crate::class_substitution(env, class_def, &args);
        for method in class_def.methods.iter().filter(|m| m.name == name) {
            let params: Vec<Type> = method
                .params
                .iter()
                .map(|p| crate::substitute(p, &subst))
                .collect();
            if out.iter().any(|existing| existing.params == params) {
                continue;
            }
            out.push(MethodDef {
                name: method.name.clone(),
                params,
                return_type: crate::substitute(&method.return_type, &subst),
                is_static: method.is_static,
                is_abstract: method.is_abstract,
            });
        }

        for sup in direct_supertypes(env, def) {
            let sup = crate::canonicalize_named(env, &crate::substitute(&sup, &subst));
            if matches!(sup, Type::Class(_)) {
                queue.push_back(sup);
            }
        }
    }

    out
}

/// Declared supertypes of `def`, super class first, then interfaces in declaration order.
///
/// Classes without an explicit super class and all interfaces implicitly extend `Object`
/// (JLS 4.10.2).
fn direct_supertypes(env: &dyn TypeEnv, def: ClassId) -> Vec<Type> {
    let Some(class_def) = env.class(def) else {
        return Vec::new();
    };
    let object = env.well_known().object;

    let mut out = Vec::with_capacity(class_def.interfaces.len() + 1);
    match &class_def.super_class {
        Some(sc) => out.push(sc.clone()),
        None if class_def.kind == ClassKind::Class && def != object => {
            out.push(Type::class(object, vec![]))
        }
        None => {}
    }
    out.extend(class_def.interfaces.iter().cloned());
    if class_def.kind == ClassKind::Interface {
        out.push(Type::class(object, vec![]));
    }
    out
}

fn raw_class_type(env: &dyn TypeEnv, ty: &Type) -> Option<Type> {
    let ty = crate::canonicalize_named(env, ty);
    match ty {
        Type::Class(ClassType { def, .. }) => Some(Type::class(def, vec![])),
        _ => None,
    }
}
