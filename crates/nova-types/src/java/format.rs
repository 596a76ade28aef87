use crate::{ClassType, Type, TypeEnv};

/// Render `ty` the way Java source would spell it, using binary names for classes.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Void => out.push_str("void"),
        Type::Primitive(prim) => out.push_str(prim.keyword()),
        Type::Class(ClassType { def, args }) => {
            match env.class(*def) {
                Some(class_def) => out.push_str(&class_def.name),
                None => out.push_str(&format!("<class#{}>", def.to_raw())),
            }
            if !args.is_empty() {
                out.push('<');
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    write_type(env, arg, out);
                }
                out.push('>');
            }
        }
        Type::Array(elem) => {
            write_type(env, elem, out);
            out.push_str("[]");
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(tp) => out.push_str(&tp.name),
            None => out.push_str(&format!("<tv#{}>", id.to_raw())),
        },
        Type::Named(name) => out.push_str(name),
        Type::Null => out.push_str("null"),
        Type::Unknown => out.push_str("<unknown>"),
    }
}
