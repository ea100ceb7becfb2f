use std::fmt;

pub mod source_map;
pub use source_map::SourceMap;

// ---- Span infrastructure ----

/// Byte range within source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const UNKNOWN: Span = Span { start: 0, end: 0 };

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Wraps a node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Spanned { node, span }
    }

    pub fn unknown(node: T) -> Self {
        Spanned { node, span: Span::UNKNOWN }
    }
}

impl<T> std::ops::Deref for Spanned<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.node
    }
}

// ---- Declarations ----

/// One parsed Go source unit. Only the declaration level is kept; function
/// bodies and `var`/`const` initialisers are skipped by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Spanned<String>,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f),
            _ => None,
        })
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Type(t) => Some(t),
            _ => None,
        })
    }
}

/// `import alias "path"`; `path` keeps its quotes as written.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeSpec),
    /// A declaration that failed to parse; the error is reported separately.
    Error { span: Span },
}

/// `func (recv) Name[T any](params) results { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub recv: Option<Field>,
    pub type_params: Vec<Field>,
    pub sig: Signature,
    pub has_body: bool,
    pub span: Span,
}

/// `type Name[T any] Type` or `type Name = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub type_params: Vec<Field>,
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A parameter, result, type parameter or struct field group:
/// `a, b int`, an unnamed `int`, or an embedded `pkg.Base`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

impl Field {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Field { names: Vec::new(), ty, tag: None }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Field>,
    /// Empty when the declaration has no result list.
    pub results: Vec<Field>,
}

// ---- Types ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T`, `pkg.T`, `T[A, B]`
    Named {
        pkg: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// `[len]T`; `len` is the source text of the length expression.
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(Signature),
    Struct(Vec<Field>),
    Interface(Vec<InterfaceElem>),
    /// Final parameter `...T`
    Variadic(Box<TypeExpr>),
    /// Constraint union `A | ~B`
    Union(Vec<TypeExpr>),
    /// Constraint term `~T`
    Tilde(Box<TypeExpr>),
    Paren(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named { pkg: None, name: name.into(), args: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: String, sig: Signature },
    Embed(TypeExpr),
}

// ---- Type text ----
// Printed the way go/printer prints a type expression on one line.

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write!(f, "{} ", self.names.join(", "))?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_list(f, &self.params, ", ")?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            results => {
                f.write_str(" (")?;
                write_list(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceElem::Method { name, sig } => write!(f, "{name}{sig}"),
            InterfaceElem::Embed(ty) => write!(f, "{ty}"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { pkg, name, args } => {
                if let Some(pkg) = pkg {
                    write!(f, "{pkg}.")?;
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    write_list(f, args, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(elem) => write!(f, "*{elem}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func(sig) => write!(f, "func{sig}"),
            TypeExpr::Struct(fields) if fields.is_empty() => f.write_str("struct{}"),
            TypeExpr::Struct(fields) => {
                f.write_str("struct{ ")?;
                write_list(f, fields, "; ")?;
                f.write_str(" }")
            }
            TypeExpr::Interface(elems) if elems.is_empty() => f.write_str("interface{}"),
            TypeExpr::Interface(elems) => {
                f.write_str("interface{ ")?;
                write_list(f, elems, "; ")?;
                f.write_str(" }")
            }
            TypeExpr::Variadic(elem) => write!(f, "...{elem}"),
            TypeExpr::Union(terms) => write_list(f, terms, " | "),
            TypeExpr::Tilde(elem) => write!(f, "~{elem}"),
            TypeExpr::Paren(elem) => write!(f, "({elem})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(t: TypeExpr) -> Box<TypeExpr> {
        Box::new(t)
    }

    #[test]
    fn span_merge_takes_extremes() {
        let a = Span { start: 5, end: 10 };
        let b = Span { start: 2, end: 15 };
        assert_eq!(a.merge(b), Span { start: 2, end: 15 });
    }

    #[test]
    fn span_default_is_unknown() {
        assert_eq!(Span::default(), Span::UNKNOWN);
    }

    #[test]
    fn spanned_deref() {
        let s = Spanned::new("main".to_string(), Span { start: 8, end: 12 });
        assert_eq!(s.as_str(), "main");
    }

    #[test]
    fn qualified_generic_type_text() {
        let ty = TypeExpr::Pointer(boxed(TypeExpr::Named {
            pkg: Some("list".into()),
            name: "List".into(),
            args: vec![TypeExpr::named("K"), TypeExpr::named("V")],
        }));
        assert_eq!(ty.to_string(), "*list.List[K, V]");
    }

    #[test]
    fn composite_type_text() {
        let ty = TypeExpr::Map {
            key: boxed(TypeExpr::named("string")),
            value: boxed(TypeExpr::Slice(boxed(TypeExpr::Chan {
                dir: ChanDir::Recv,
                elem: boxed(TypeExpr::named("int")),
            }))),
        };
        assert_eq!(ty.to_string(), "map[string][]<-chan int");
    }

    #[test]
    fn func_type_single_unnamed_result_has_no_parens() {
        let sig = Signature {
            params: vec![Field::unnamed(TypeExpr::named("int"))],
            results: vec![Field::unnamed(TypeExpr::named("error"))],
        };
        assert_eq!(TypeExpr::Func(sig).to_string(), "func(int) error");
    }

    #[test]
    fn func_type_named_groups() {
        let sig = Signature {
            params: vec![Field {
                names: vec!["a".into(), "b".into()],
                ty: TypeExpr::named("int"),
                tag: None,
            }],
            results: vec![
                Field::unnamed(TypeExpr::named("string")),
                Field::unnamed(TypeExpr::named("error")),
            ],
        };
        assert_eq!(TypeExpr::Func(sig).to_string(), "func(a, b int) (string, error)");
    }

    #[test]
    fn struct_and_interface_text() {
        assert_eq!(TypeExpr::Struct(vec![]).to_string(), "struct{}");
        assert_eq!(TypeExpr::Interface(vec![]).to_string(), "interface{}");
        let iface = TypeExpr::Interface(vec![InterfaceElem::Method {
            name: "Close".into(),
            sig: Signature {
                params: vec![],
                results: vec![Field::unnamed(TypeExpr::named("error"))],
            },
        }]);
        assert_eq!(iface.to_string(), "interface{ Close() error }");
    }

    #[test]
    fn constraint_union_text() {
        let ty = TypeExpr::Union(vec![
            TypeExpr::Tilde(boxed(TypeExpr::named("int"))),
            TypeExpr::named("string"),
        ]);
        assert_eq!(ty.to_string(), "~int | string");
    }
}
