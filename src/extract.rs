//! Syntax tree to declaration model.

use crate::ast::{Field, SourceFile, TypeExpr};
use crate::model::{Fn, Identifier, Import, Struct};

/// One `Fn` per top-level function or method, in declaration order.
pub fn functions(file: &SourceFile) -> Vec<Fn> {
    file.funcs()
        .map(|decl| {
            let mut f = Fn::new(decl.name.clone());
            f.receiver = decl.recv.as_ref().map(|recv| {
                let name = recv.names.first().cloned().unwrap_or_default();
                Identifier::new(name, recv.ty.to_string())
            });
            f.generics = flatten(&decl.type_params);
            f.args = flatten(&decl.sig.params);
            f.results = flatten(&decl.sig.results);
            f
        })
        .collect()
}

/// Every struct type declared at the top level, including grouped specs.
/// Aliases and non-struct types are skipped.
pub fn structs(file: &SourceFile) -> Vec<Struct> {
    file.types()
        .filter(|spec| !spec.alias)
        .filter_map(|spec| match &spec.ty {
            TypeExpr::Struct(fields) => Some(Struct {
                name: spec.name.clone(),
                generics: flatten(&spec.type_params),
                fields: struct_fields(fields),
            }),
            _ => None,
        })
        .collect()
}

pub fn imports(file: &SourceFile) -> Vec<Import> {
    file.imports
        .iter()
        .map(|spec| Import {
            alias: spec.alias.clone(),
            path: unquote(&spec.path).to_string(),
        })
        .collect()
}

/// `a, b int` gives two identifiers sharing the type; an unnamed field gives
/// one identifier with an empty name.
fn flatten(fields: &[Field]) -> Vec<Identifier> {
    fields
        .iter()
        .flat_map(|field| {
            let ty = field.ty.to_string();
            if field.names.is_empty() {
                vec![Identifier::new("", ty)]
            } else {
                field.names.iter().map(|n| Identifier::new(n.clone(), ty.clone())).collect()
            }
        })
        .collect()
}

fn struct_fields(fields: &[Field]) -> Vec<Identifier> {
    fields
        .iter()
        .flat_map(|field| {
            let ty = field.ty.to_string();
            if field.names.is_empty() {
                vec![Identifier::new(embedded_name(&field.ty), ty)]
            } else {
                field.names.iter().map(|n| Identifier::new(n.clone(), ty.clone())).collect()
            }
        })
        .collect()
}

/// Field name Go gives an embedded type: `*pkg.Base[T]` is `Base`.
fn embedded_name(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Pointer(inner) | TypeExpr::Paren(inner) => embedded_name(inner),
        TypeExpr::Named { name, .. } => name.clone(),
        other => {
            let text = other.to_string();
            text.rsplit('.').next().unwrap_or_default().to_string()
        }
    }
}

fn unquote(path: &str) -> &str {
    path.trim_matches(|c| c == '"' || c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn file(source: &str) -> SourceFile {
        parse_source(source).unwrap()
    }

    fn pairs(ids: &[Identifier]) -> Vec<(&str, &str)> {
        ids.iter().map(|i| (i.name.as_str(), i.ty.as_str())).collect()
    }

    #[test]
    fn functions_in_declaration_order() {
        let f = file("package p\nfunc B() {}\nfunc A() {}\nfunc (s *S) C() {}\n");
        let names: Vec<_> = functions(&f).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn grouped_args_are_flattened() {
        let f = file("package p\nfunc Add(a, b int, s string) (int, error) { return 0, nil }\n");
        let fns = functions(&f);
        assert_eq!(pairs(&fns[0].args), vec![("a", "int"), ("b", "int"), ("s", "string")]);
        assert_eq!(pairs(&fns[0].results), vec![("", "int"), ("", "error")]);
    }

    #[test]
    fn no_results_gives_empty_list() {
        let f = file("package p\nfunc F(int) {}\n");
        let fns = functions(&f);
        assert_eq!(pairs(&fns[0].args), vec![("", "int")]);
        assert!(fns[0].results.is_empty());
    }

    #[test]
    fn receiver_keeps_pointer_marker() {
        let f = file("package p\nfunc (s *Service) Do() {}\nfunc (Point) Norm() float64 { return 0 }\n");
        let fns = functions(&f);
        assert_eq!(fns[0].receiver, Some(Identifier::new("s", "*Service")));
        assert_eq!(fns[0].receiver_type_name(), Some("Service"));
        assert_eq!(fns[1].receiver, Some(Identifier::new("", "Point")));
    }

    #[test]
    fn type_params_share_constraint() {
        let f = file("package p\nfunc Pair[K, V comparable, R any](k K, v V) R { var r R; return r }\n");
        let fns = functions(&f);
        assert_eq!(
            pairs(&fns[0].generics),
            vec![("K", "comparable"), ("V", "comparable"), ("R", "any")]
        );
    }

    #[test]
    fn variadic_arg_type_text() {
        let f = file("package p\nfunc Sum(xs ...int) int { return 0 }\n");
        assert_eq!(pairs(&functions(&f)[0].args), vec![("xs", "...int")]);
    }

    #[test]
    fn structs_with_embedded_and_grouped_fields() {
        let f = file(
            "package p\ntype (\n\tID int\n\tService[T any] struct {\n\t\ta, b int\n\t\t*pkg.Base[T]\n\t\tsync.Mutex\n\t\tLogger\n\t}\n)\ntype Alias = struct{ x int }\n",
        );
        let structs = structs(&f);
        assert_eq!(structs.len(), 1);
        let s = &structs[0];
        assert_eq!(s.name, "Service");
        assert_eq!(pairs(&s.generics), vec![("T", "any")]);
        assert_eq!(
            pairs(&s.fields),
            vec![
                ("a", "int"),
                ("b", "int"),
                ("Base", "*pkg.Base[T]"),
                ("Mutex", "sync.Mutex"),
                ("Logger", "Logger"),
            ]
        );
    }

    #[test]
    fn imports_are_unquoted() {
        let f = file("package p\nimport (\n\t\"fmt\"\n\tyaml \"gopkg.in/yaml.v3\"\n\t_ `embed`\n)\n");
        let imps = imports(&f);
        assert_eq!(imps[0], Import { alias: None, path: "fmt".into() });
        assert_eq!(imps[1], Import { alias: Some("yaml".into()), path: "gopkg.in/yaml.v3".into() });
        assert_eq!(imps[2].path, "embed");
    }

    #[test]
    fn declarations_other_than_funcs_ignored() {
        let f = file("package p\nvar x = 1\ntype T struct{}\nconst y = 2\n");
        assert!(functions(&f).is_empty());
    }
}
