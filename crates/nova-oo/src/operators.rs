use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Binary lexemes and the `java.math.BigInteger`-style method implementing them.
const BINARY: &[(&str, &str)] = &[
    ("+", "add"),
    ("-", "subtract"),
    ("*", "multiply"),
    ("/", "divide"),
    ("%", "remainder"),
    ("&", "and"),
    ("|", "or"),
    ("^", "xor"),
    ("<<", "shiftLeft"),
    (">>", "shiftRight"),
    ("<", "compareTo"),
    (">", "compareTo"),
    ("<=", "compareTo"),
    (">=", "compareTo"),
];

const UNARY: &[(&str, &str)] = &[("-", "negate"), ("~", "not")];

const INDEX_GET: &str = "get";
const INDEX_SET: &[&str] = &["set", "put"];
const CONVERSION: &[&str] = &["valueOf"];
const REVERSED_SUFFIX: &str = "Rev";

/// Maps operator lexemes to the conventional method names a class defines to overload them.
///
/// Lookups never fail: an unmapped lexeme is `None` and callers treat it as unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorTable {
    binary: BTreeMap<String, String>,
    unary: BTreeMap<String, String>,
    index_get: String,
    index_set: Vec<String>,
    conversion: Vec<String>,
    reversed_suffix: String,
    no_reversed: BTreeSet<String>,
}

impl OperatorTable {
    /// The Java-OO conventions: `a + b` is `a.add(b)`, falling back to `b.addRev(a)`.
    pub fn java_oo() -> Self {
        Self {
            binary: to_map(BINARY),
            unary: to_map(UNARY),
            index_get: INDEX_GET.to_string(),
            index_set: INDEX_SET.iter().map(|s| s.to_string()).collect(),
            conversion: CONVERSION.iter().map(|s| s.to_string()).collect(),
            reversed_suffix: REVERSED_SUFFIX.to_string(),
            no_reversed: BTreeSet::new(),
        }
    }

    /// Process-wide instance of [`OperatorTable::java_oo`], built once.
    pub fn shared() -> &'static OperatorTable {
        static TABLE: OnceLock<OperatorTable> = OnceLock::new();
        TABLE.get_or_init(OperatorTable::java_oo)
    }

    pub fn binary_method(&self, lexeme: &str) -> Option<&str> {
        self.binary.get(lexeme).map(String::as_str)
    }

    pub fn unary_method(&self, lexeme: &str) -> Option<&str> {
        self.unary.get(lexeme).map(String::as_str)
    }

    pub fn index_get_method(&self) -> &str {
        &self.index_get
    }

    /// Index-set method names in priority order.
    pub fn index_set_methods(&self) -> &[String] {
        &self.index_set
    }

    /// Conversion factory names (`Target.valueOf(source)`) in priority order.
    pub fn conversion_methods(&self) -> &[String] {
        &self.conversion
    }

    pub fn reversed_suffix(&self) -> &str {
        &self.reversed_suffix
    }

    /// Method name the right operand must declare for the reversed fallback of `lexeme`.
    ///
    /// `None` when `lexeme` is not a binary operator or has been excluded from the fallback.
    pub fn reversed_method(&self, lexeme: &str) -> Option<String> {
        if self.no_reversed.contains(lexeme) {
            return None;
        }
        let forward = self.binary_method(lexeme)?;
        Some(format!("{forward}{}", self.reversed_suffix))
    }

    pub fn binary_lexemes(&self) -> impl Iterator<Item = &str> {
        self.binary.keys().map(String::as_str)
    }

    pub fn with_binary(mut self, lexeme: impl Into<String>, method: impl Into<String>) -> Self {
        self.binary.insert(lexeme.into(), method.into());
        self
    }

    pub fn without_binary(mut self, lexeme: &str) -> Self {
        self.binary.remove(lexeme);
        self
    }

    pub fn with_unary(mut self, lexeme: impl Into<String>, method: impl Into<String>) -> Self {
        self.unary.insert(lexeme.into(), method.into());
        self
    }

    pub fn without_unary(mut self, lexeme: &str) -> Self {
        self.unary.remove(lexeme);
        self
    }

    pub fn with_index_get(mut self, method: impl Into<String>) -> Self {
        self.index_get = method.into();
        self
    }

    pub fn with_index_set<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_set = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_conversion<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conversion = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reversed_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.reversed_suffix = suffix.into();
        self
    }

    /// Exclude `lexeme` from the reversed-operand fallback.
    pub fn without_reversed(mut self, lexeme: impl Into<String>) -> Self {
        self.no_reversed.insert(lexeme.into());
        self
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::java_oo()
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(lexeme, method)| (lexeme.to_string(), method.to_string()))
        .collect()
}
