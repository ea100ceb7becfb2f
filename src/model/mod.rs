//! Declaration model handed from the extractor to the plugins and renderer.
//!
//! Every value here is plain owned data built fresh for one run; a `Struct`
//! is cloned into each `Fn` whose receiver names it.

use serde::Serialize;

pub mod naming;

/// A name and its type text. Used for type parameters, arguments, results
/// and struct fields alike. The name is empty for unnamed parameters until
/// the naming pass runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Identifier { name: name.into(), ty: ty.into() }
    }
}

/// `import alias "path"`; `path` is unquoted and `alias` is `None` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub alias: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Struct {
    pub name: String,
    pub generics: Vec<Identifier>,
    pub fields: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fn {
    pub name: String,
    pub receiver: Option<Identifier>,
    pub generics: Vec<Identifier>,
    pub args: Vec<Identifier>,
    pub results: Vec<Identifier>,
    /// Definition of the receiver's struct, attached by the struct resolver.
    pub receiver_struct: Option<Struct>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Fn {
            name: name.into(),
            receiver: None,
            generics: Vec::new(),
            args: Vec::new(),
            results: Vec::new(),
            receiver_struct: None,
        }
    }

    /// Receiver type text without pointer marker, parentheses or type
    /// arguments: `*Stack[T]` gives `Stack`. This is also the key used to
    /// look up the receiver's struct.
    pub fn receiver_type_name(&self) -> Option<&str> {
        self.receiver.as_ref().map(|r| base_type_name(&r.ty))
    }

    /// `Test_` + optional `<ReceiverType>_` + name.
    pub fn test_name(&self) -> String {
        match self.receiver_type_name() {
            Some(recv) => format!("Test_{recv}_{}", self.name),
            None => format!("Test_{}", self.name),
        }
    }
}

/// Strip `*`, `(`/`)` and a trailing `[...]` from a receiver type.
pub fn base_type_name(ty: &str) -> &str {
    let ty = ty.trim_start_matches(['*', '(', ' ']);
    let end = ty.find(['[', ')']).unwrap_or(ty.len());
    ty[..end].trim()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub package_name: String,
    /// Only filled when the test file is created from scratch, so appending
    /// never repeats an import block.
    pub imports: Vec<Import>,
    pub functions: Vec<Fn>,
    /// The destination test file already exists and new tests are appended.
    pub appending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(recv_ty: &str, name: &str) -> Fn {
        let mut f = Fn::new(name);
        f.receiver = Some(Identifier::new("s", recv_ty));
        f
    }

    #[test]
    fn test_name_for_function() {
        assert_eq!(Fn::new("Add").test_name(), "Test_Add");
    }

    #[test]
    fn test_name_for_pointer_receiver() {
        assert_eq!(method("*Service", "Do").test_name(), "Test_Service_Do");
    }

    #[test]
    fn test_name_for_value_receiver() {
        assert_eq!(method("Point", "Norm").test_name(), "Test_Point_Norm");
    }

    #[test]
    fn test_name_ignores_type_args_and_parens() {
        assert_eq!(method("*Stack[T]", "Push").test_name(), "Test_Stack_Push");
        assert_eq!(method("(*Pair[K, V])", "Swap").test_name(), "Test_Pair_Swap");
    }

    #[test]
    fn test_name_does_not_depend_on_attached_struct() {
        let mut f = method("*Service", "Do");
        let before = f.test_name();
        f.receiver_struct = Some(Struct {
            name: "Service".into(),
            generics: vec![],
            fields: vec![],
        });
        assert_eq!(f.test_name(), before);
    }

    #[test]
    fn receiver_type_name_absent_for_functions() {
        assert_eq!(Fn::new("F").receiver_type_name(), None);
    }

    #[test]
    fn identifier_serializes_type_key() {
        let json = serde_json::to_value(Identifier::new("a", "int")).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["type"], "int");
    }
}
