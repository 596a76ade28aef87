use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, PrimitiveType, Type, TypeEnv, TypeParamDef,
    TypeVarId, WellKnownTypes,
};

/// In-memory declaration snapshot implementing [`TypeEnv`].
///
/// Class ids are dense indices into the store. Ids can be reserved with
/// [`TypeStore::intern_class_id`] before their definition is known, which is how
/// self-referential declarations (`class Money implements Comparable<Money>`) are built.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    class_by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

/// Serializable form of a [`TypeStore`]; class ids and type variable ids are vector indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStoreSnapshot {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub type_params: Vec<TypeParamDef>,
}

impl TypeStore {
    fn empty() -> Self {
        let placeholder = ClassId::new(0);
        let mut store = Self {
            classes: Vec::new(),
            type_params: Vec::new(),
            class_by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
            },
        };
        store.well_known = WellKnownTypes {
            object: store.intern_class_id("java.lang.Object"),
            string: store.intern_class_id("java.lang.String"),
            cloneable: store.intern_class_id("java.lang.Cloneable"),
            serializable: store.intern_class_id("java.io.Serializable"),
        };
        store
    }

    /// Rebuild a store from a snapshot, e.g. one shipped by a host as JSON.
    ///
    /// Well-known classes missing from the snapshot are reserved as empty placeholders.
    pub fn from_snapshot(snapshot: TypeStoreSnapshot) -> Self {
        let mut store = Self {
            classes: Vec::with_capacity(snapshot.classes.len()),
            type_params: snapshot.type_params,
            class_by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: ClassId::new(0),
                string: ClassId::new(0),
                cloneable: ClassId::new(0),
                serializable: ClassId::new(0),
            },
        };
        for class_def in snapshot.classes {
            let id = store.next_class_id();
            store.class_by_name.entry(class_def.name.clone()).or_insert(id);
            store.classes.push(class_def);
        }
        store.well_known = WellKnownTypes {
            object: store.intern_class_id("java.lang.Object"),
            string: store.intern_class_id("java.lang.String"),
            cloneable: store.intern_class_id("java.lang.Cloneable"),
            serializable: store.intern_class_id("java.io.Serializable"),
        };
        store
    }

    pub fn snapshot(&self) -> TypeStoreSnapshot {
        TypeStoreSnapshot {
            classes: self.classes.clone(),
            type_params: self.type_params.clone(),
        }
    }

    fn next_class_id(&self) -> ClassId {
        let idx: u32 = self
            .classes
            .len()
            .try_into()
            .unwrap_or(u32::MAX);
        ClassId::new(idx)
    }

    /// Reserve (or return the existing) id for `name`.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let id = self.next_class_id();
        self.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        });
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    /// Replace the definition behind a reserved id.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let Some(slot) = self.classes.get_mut(id.to_raw() as usize) else {
            return;
        };
        self.class_by_name.insert(def.name.clone(), id);
        *slot = def;
    }

    /// Add (or replace) a class keyed by its binary name.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let idx: u32 = self
            .type_params
            .len()
            .try_into()
            .unwrap_or(u32::MAX);
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        TypeVarId::new(idx)
    }

    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.to_raw() as usize) {
            *slot = def;
        }
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// A store pre-populated with the handful of JDK classes operator overloading cares about:
    /// `Object`, `String`, the primitive wrappers, `Number`, `Comparable`, `BigInteger`,
    /// `BigDecimal`, `List`/`ArrayList` and `Map`/`HashMap`.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::empty();
        let wk = store.well_known;
        let object = Type::class(wk.object, vec![]);
        let string = Type::class(wk.string, vec![]);

        store.define_class(
            wk.object,
            ClassDef {
                name: "java.lang.Object".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
                methods: vec![
                    MethodDef::new("equals", vec![object.clone()], Type::boolean()),
                    MethodDef::new("hashCode", vec![], Type::int()),
                    MethodDef::new("toString", vec![], string.clone()),
                ],
            },
        );
        for (id, name) in [
            (wk.cloneable, "java.lang.Cloneable"),
            (wk.serializable, "java.io.Serializable"),
        ] {
            store.define_class(id, interface(name, vec![], vec![], vec![]));
        }

        // interface Comparable<T> { int compareTo(T o); }
        let comparable_t = store.add_type_param("T", vec![object.clone()]);
        let comparable = store.add_class(interface(
            "java.lang.Comparable",
            vec![comparable_t],
            vec![],
            vec![abstract_method(
                "compareTo",
                vec![Type::TypeVar(comparable_t)],
                Type::int(),
            )],
        ));
        let comparable_of = |ty: Type| Type::class(comparable, vec![ty]);
        let serializable = Type::class(wk.serializable, vec![]);

        store.define_class(
            wk.string,
            class(
                "java.lang.String",
                vec![],
                Some(object.clone()),
                vec![serializable.clone(), comparable_of(string.clone())],
                vec![
                    MethodDef::new("length", vec![], Type::int()),
                    MethodDef::new(
                        "charAt",
                        vec![Type::int()],
                        Type::Primitive(PrimitiveType::Char),
                    ),
                    MethodDef::new("concat", vec![string.clone()], string.clone()),
                    MethodDef::new("compareTo", vec![string.clone()], Type::int()),
                    MethodDef::new_static("valueOf", vec![Type::int()], string.clone()),
                    MethodDef::new_static("valueOf", vec![object.clone()], string.clone()),
                ],
            ),
        );

        let number = store.add_class(class(
            "java.lang.Number",
            vec![],
            Some(object.clone()),
            vec![serializable.clone()],
            vec![
                abstract_method("intValue", vec![], Type::int()),
                abstract_method("longValue", vec![], Type::long()),
                abstract_method("doubleValue", vec![], Type::double()),
            ],
        ));
        let number = Type::class(number, vec![]);

        for prim in PrimitiveType::ALL {
            let name = prim.boxed_binary_name();
            let id = store.intern_class_id(name);
            let boxed = Type::class(id, vec![]);
            let super_class = match prim {
                PrimitiveType::Boolean | PrimitiveType::Char => object.clone(),
                _ => number.clone(),
            };
            store.define_class(
                id,
                class(
                    name,
                    vec![],
                    Some(super_class),
                    vec![serializable.clone(), comparable_of(boxed.clone())],
                    vec![
                        MethodDef::new("compareTo", vec![boxed.clone()], Type::int()),
                        MethodDef::new_static("valueOf", vec![Type::Primitive(prim)], boxed),
                    ],
                ),
            );
        }

        for name in ["java.math.BigInteger", "java.math.BigDecimal"] {
            let id = store.intern_class_id(name);
            let this = Type::class(id, vec![]);
            let mut methods: Vec<MethodDef> = ["add", "subtract", "multiply", "divide", "remainder"]
                .into_iter()
                .map(|op| MethodDef::new(op, vec![this.clone()], this.clone()))
                .collect();
            methods.push(MethodDef::new("negate", vec![], this.clone()));
            methods.push(MethodDef::new("compareTo", vec![this.clone()], Type::int()));
            methods.push(MethodDef::new_static("valueOf", vec![Type::long()], this.clone()));
            if name == "java.math.BigInteger" {
                for op in ["and", "or", "xor"] {
                    methods.push(MethodDef::new(op, vec![this.clone()], this.clone()));
                }
                for op in ["shiftLeft", "shiftRight"] {
                    methods.push(MethodDef::new(op, vec![Type::int()], this.clone()));
                }
                methods.push(MethodDef::new("not", vec![], this.clone()));
            } else {
                methods.push(MethodDef::new_static("valueOf", vec![Type::double()], this.clone()));
            }
            store.define_class(
                id,
                class(
                    name,
                    vec![],
                    Some(number.clone()),
                    vec![comparable_of(this)],
                    methods,
                ),
            );
        }

        // interface List<E> / class ArrayList<E> implements List<E>
        let list_e = store.add_type_param("E", vec![object.clone()]);
        let e = Type::TypeVar(list_e);
        let list = store.add_class(interface(
            "java.util.List",
            vec![list_e],
            vec![],
            vec![
                abstract_method("get", vec![Type::int()], e.clone()),
                abstract_method("set", vec![Type::int(), e.clone()], e.clone()),
                abstract_method("add", vec![e.clone()], Type::boolean()),
                abstract_method("size", vec![], Type::int()),
            ],
        ));
        let array_list_e = store.add_type_param("E", vec![object.clone()]);
        store.add_class(class(
            "java.util.ArrayList",
            vec![array_list_e],
            Some(object.clone()),
            vec![Type::class(list, vec![Type::TypeVar(array_list_e)])],
            vec![],
        ));

        // interface Map<K, V> / class HashMap<K, V> implements Map<K, V>
        let map_k = store.add_type_param("K", vec![object.clone()]);
        let map_v = store.add_type_param("V", vec![object.clone()]);
        let map = store.add_class(interface(
            "java.util.Map",
            vec![map_k, map_v],
            vec![],
            vec![
                abstract_method("get", vec![object.clone()], Type::TypeVar(map_v)),
                abstract_method(
                    "put",
                    vec![Type::TypeVar(map_k), Type::TypeVar(map_v)],
                    Type::TypeVar(map_v),
                ),
                abstract_method("size", vec![], Type::int()),
            ],
        ));
        let hash_map_k = store.add_type_param("K", vec![object.clone()]);
        let hash_map_v = store.add_type_param("V", vec![object.clone()]);
        store.add_class(class(
            "java.util.HashMap",
            vec![hash_map_k, hash_map_v],
            Some(object),
            vec![Type::class(
                map,
                vec![Type::TypeVar(hash_map_k), Type::TypeVar(hash_map_v)],
            )],
            vec![],
        ));

        store
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_minimal_jdk()
    }
}

fn class(
    name: &str,
    type_params: Vec<TypeVarId>,
    super_class: Option<Type>,
    interfaces: Vec<Type>,
    methods: Vec<MethodDef>,
) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        type_params,
        super_class,
        interfaces,
        methods,
    }
}

fn interface(
    name: &str,
    type_params: Vec<TypeVarId>,
    interfaces: Vec<Type>,
    methods: Vec<MethodDef>,
) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        type_params,
        super_class: None,
        interfaces,
        methods,
    }
}

fn abstract_method(name: &str, params: Vec<Type>, return_type: Type) -> MethodDef {
    MethodDef {
        is_abstract: true,
        ..MethodDef::new(name, params, return_type)
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.to_raw() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        // Simple names resolve against the implicit `java.lang.*` import.
        if !name.contains('.') {
            return self.class_id(&format!("java.lang.{name}"));
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    fn methods_named(&self, class: ClassId, name: &str) -> Vec<MethodDef> {
        crate::flatten_methods(self, class, name)
    }

    fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        crate::is_assignable(self, from, to)
    }
}
