use crate::model::{Identifier, Import, naming};
use crate::plugins::{PluggableFile, PluggableFn, RESERVED_LOCALS, any_args};

pub const REQUIRE_IMPORT: &str = "github.com/stretchr/testify/require";
const TESTING_IMPORT: &str = "testing";
const PLACEHOLDER: &str = "// TODO: add test cases.";

/// Render the test functions of `file`. A fresh file also gets the package
/// clause and an import block; appended output is only the functions.
pub fn emit(file: &PluggableFile) -> String {
    let mut body = String::new();
    for (i, f) in file.functions.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        emit_test(&mut body, f);
    }
    if file.appending {
        return body;
    }

    let mut out = String::new();
    out.push_str(&format!("package {}\n\n", file.package_name));
    emit_imports(&mut out, file, &body);
    out.push('\n');
    out.push_str(&body);
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}

fn line(out: &mut String, level: usize, text: &str) {
    indent(out, level);
    out.push_str(text);
    out.push('\n');
}

// ---- Imports ----

fn emit_imports(out: &mut String, file: &PluggableFile, body: &str) {
    let type_texts: Vec<&str> = file
        .functions
        .iter()
        .flat_map(|f| {
            f.fields()
                .iter()
                .chain(&f.func.args)
                .chain(&f.func.results)
                .chain(f.func.receiver.as_ref())
                .map(|id| id.ty.as_str())
        })
        .collect();

    let mut std_specs: Vec<(String, String)> = vec![(TESTING_IMPORT.into(), quoted(TESTING_IMPORT))];
    let mut other_specs: Vec<(String, String)> = Vec::new();
    if body.contains("require.") {
        other_specs.push((REQUIRE_IMPORT.into(), quoted(REQUIRE_IMPORT)));
    }
    for imp in &file.imports {
        if imp.path == TESTING_IMPORT || imp.path == REQUIRE_IMPORT {
            continue;
        }
        let Some(q) = qualifier(imp) else { continue };
        if !type_texts.iter().any(|t| uses_qualifier(t, q)) {
            continue;
        }
        let spec = match &imp.alias {
            Some(alias) => format!("{alias} {}", quoted(&imp.path)),
            None => quoted(&imp.path),
        };
        if is_std(&imp.path) {
            std_specs.push((imp.path.clone(), spec));
        } else {
            other_specs.push((imp.path.clone(), spec));
        }
    }
    std_specs.sort();
    other_specs.sort();

    out.push_str("import (\n");
    for (_, spec) in &std_specs {
        line(out, 1, spec);
    }
    if !other_specs.is_empty() {
        out.push('\n');
        for (_, spec) in &other_specs {
            line(out, 1, spec);
        }
    }
    out.push_str(")\n");
}

fn quoted(path: &str) -> String {
    format!("\"{path}\"")
}

/// Standard library paths have no dot in their first element.
fn is_std(path: &str) -> bool {
    !path.split('/').next().unwrap_or(path).contains('.')
}

/// Name the generated code uses to refer to an import, or `None` for blank
/// and dot imports.
pub fn qualifier(imp: &Import) -> Option<&str> {
    match imp.alias.as_deref() {
        Some("_") | Some(".") => None,
        Some(alias) => Some(alias),
        None => Some(package_name(&imp.path)),
    }
}

/// Package name implied by an import path: the last element, skipping a
/// `vN` major-version element and a `.vN` suffix (`gopkg.in/yaml.v3` is `yaml`).
pub fn package_name(path: &str) -> &str {
    let mut elems = path.rsplit('/');
    let last = elems.next().unwrap_or(path);
    let last = if is_major_version(last) { elems.next().unwrap_or(last) } else { last };
    match last.rsplit_once('.') {
        Some((name, version)) if is_major_version(version) => name,
        _ => last,
    }
}

fn is_major_version(s: &str) -> bool {
    s.strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Byte ranges of the identifiers in a type text.
fn idents(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        let ident_char = c == '_' || c.is_alphabetic() || (start.is_some() && c.is_numeric());
        match (start, ident_char) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

fn preceded_by_dot(text: &str, start: usize) -> bool {
    text[..start].ends_with('.')
}

fn uses_qualifier(ty: &str, q: &str) -> bool {
    idents(ty)
        .into_iter()
        .any(|(s, e)| &ty[s..e] == q && !preceded_by_dot(ty, s) && ty[e..].starts_with('.'))
}

/// Replace unqualified uses of the given type parameters with `any`.
fn instantiate(ty: &str, params: &[String]) -> String {
    if params.is_empty() {
        return ty.to_string();
    }
    let mut out = String::with_capacity(ty.len());
    let mut last = 0;
    for (s, e) in idents(ty) {
        let word = &ty[s..e];
        if params.iter().any(|p| p == word) && !preceded_by_dot(ty, s) {
            out.push_str(&ty[last..s]);
            out.push_str("any");
            last = e;
        }
    }
    out.push_str(&ty[last..]);
    out
}

/// Variadic parameters are stored in the args struct as slices.
fn arg_define(ty: &str) -> String {
    match ty.strip_prefix("...") {
        Some(elem) => format!("[]{elem}"),
        None => ty.to_string(),
    }
}

/// Type arguments written on a receiver: `*Stack[K, V]` gives `K`, `V`.
fn receiver_type_params(ty: &str) -> Vec<String> {
    match (ty.find('['), ty.rfind(']')) {
        (Some(open), Some(close)) if open < close => ty[open + 1..close]
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

// ---- Test functions ----

struct Members {
    rows: Vec<(String, String)>,
}

impl Members {
    fn new() -> Self {
        Members { rows: Vec::new() }
    }

    fn push(&mut self, name: impl Into<String>, ty: impl Into<String>) {
        self.rows.push((name.into(), ty.into()));
    }

    /// One `name type` line per member, types aligned the way gofmt does.
    fn emit(&self, out: &mut String, level: usize) {
        let width = self.rows.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
        for (name, ty) in &self.rows {
            line(out, level, &format!("{name:<width$} {ty}"));
        }
    }
}

fn emit_struct_type(out: &mut String, name: &str, members: &Members) {
    line(out, 1, &format!("type {name} struct {{"));
    members.emit(out, 2);
    line(out, 1, "}");
    out.push('\n');
}

fn emit_test(out: &mut String, pf: &PluggableFn) {
    let f = &pf.func;
    let recv_params = f.receiver.as_ref().map(|r| receiver_type_params(&r.ty)).unwrap_or_default();
    let struct_params: Vec<String> = match &f.receiver_struct {
        Some(s) if !s.generics.is_empty() => s.generics.iter().map(|g| g.name.clone()).collect(),
        _ => recv_params.clone(),
    };
    let fn_params: Vec<String> = f.generics.iter().map(|g| g.name.clone()).chain(recv_params.iter().cloned()).collect();

    let mut fields = Members::new();
    for field in pf.fields() {
        fields.push(&field.name, instantiate(&field.ty, &struct_params));
    }
    let mut args = Members::new();
    for arg in &f.args {
        args.push(&arg.name, instantiate(&arg_define(&arg.ty), &fn_params));
    }
    let mut want = Members::new();
    for result in &f.results {
        want.push(&result.name, instantiate(&result.ty, &fn_params));
    }

    line(out, 0, &format!("func {}(t *testing.T) {{", pf.test_name()));

    let mut table = Members::new();
    table.push("name", "string");
    if !fields.rows.is_empty() {
        emit_struct_type(out, "fields", &fields);
        table.push("fields", "fields");
    }
    if !args.rows.is_empty() {
        emit_struct_type(out, "args", &args);
        table.push("args", "args");
    }
    if !want.rows.is_empty() {
        emit_struct_type(out, "want", &want);
        table.push("want", "want");
    }

    line(out, 1, "testcases := []struct {");
    table.emit(out, 2);
    line(out, 1, "}{");
    line(out, 2, PLACEHOLDER);
    line(out, 1, "}");
    out.push('\n');

    line(out, 1, "for _, tt := range testcases {");
    line(out, 2, "t.Run(tt.name, func(t *testing.T) {");

    let call = match &f.receiver {
        Some(recv) => {
            let var = receiver_var(pf, recv);
            emit_receiver(out, pf, recv, &var, struct_params.len());
            format!("{var}.{}", f.name)
        }
        None => format!("{}{}", f.name, pf.generic_args()),
    };
    let call = format!("{call}({})", pf.call_args());
    if f.results.is_empty() {
        line(out, 3, &call);
    } else {
        line(out, 3, &format!("{} := {call}", pf.got_names().join(", ")));
    }
    for check in pf.verification.lines() {
        line(out, 3, check);
    }

    line(out, 2, "})");
    line(out, 1, "}");
    line(out, 0, "}");
}

/// `s := &Service{ db: tt.fields.db }` with the fields aligned like gofmt.
fn emit_receiver(out: &mut String, pf: &PluggableFn, recv: &Identifier, var: &str, n_type_params: usize) {
    let type_name = pf.func.receiver_type_name().unwrap_or_default();
    let amp = if recv.ty.trim_start_matches('(').starts_with('*') { "&" } else { "" };
    let head = format!("{var} := {amp}{type_name}{}", any_args(n_type_params));

    let names = pf.field_names();
    if names.is_empty() {
        line(out, 3, &format!("{head}{{}}"));
    } else {
        line(out, 3, &format!("{head}{{"));
        let width = names.iter().map(|n| n.chars().count() + 1).max().unwrap_or(0);
        for name in names {
            let key = format!("{name}:");
            line(out, 4, &format!("{key:<width$} tt.fields.{name},"));
        }
        line(out, 3, "}");
    }
    out.push('\n');
}

/// The receiver's own name when usable, else the lowercased first letter of
/// its type, else `sut`.
fn receiver_var(pf: &PluggableFn, recv: &Identifier) -> String {
    let got = pf.got_names();
    let usable = |name: &str| !naming::is_anonymous(name) && !RESERVED_LOCALS.contains(&name) && !got.iter().any(|g| g == name);
    if usable(&recv.name) {
        return recv.name.clone();
    }
    let initial: String = pf
        .func
        .receiver_type_name()
        .and_then(|t| t.chars().next())
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default();
    if usable(&initial) { initial } else { "sut".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{self, Struct};
    use crate::plugins::Pipeline;

    fn id(name: &str, ty: &str) -> Identifier {
        Identifier::new(name, ty)
    }

    fn render(functions: Vec<model::Fn>, imports: Vec<Import>, appending: bool) -> String {
        let file = model::File { package_name: "calc".into(), imports, functions, appending };
        emit(&Pipeline::default().apply(file))
    }

    #[test]
    fn fresh_file_for_plain_function() {
        let mut f = model::Fn::new("Add");
        f.args = vec![id("a", "int"), id("b", "int")];
        f.results = vec![id("want", "int")];
        let out = render(vec![f], vec![], false);
        let expected = "\
package calc

import (
\t\"testing\"

\t\"github.com/stretchr/testify/require\"
)

func Test_Add(t *testing.T) {
\ttype args struct {
\t\ta int
\t\tb int
\t}

\ttype want struct {
\t\twant int
\t}

\ttestcases := []struct {
\t\tname string
\t\targs args
\t\twant want
\t}{
\t\t// TODO: add test cases.
\t}

\tfor _, tt := range testcases {
\t\tt.Run(tt.name, func(t *testing.T) {
\t\t\tgot := Add(tt.args.a, tt.args.b)
\t\t\trequire.Equal(t, tt.want.want, got)
\t\t})
\t}
}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn method_with_error_result_and_fields() {
        let mut f = model::Fn::new("Do");
        f.receiver = Some(id("s", "*Service"));
        f.args = vec![id("ctx", "context.Context")];
        f.results = vec![id("want", "string"), id("wantErr", "error")];
        f.receiver_struct = Some(Struct {
            name: "Service".into(),
            generics: vec![],
            fields: vec![id("db", "*sql.DB"), id("retries", "int")],
        });
        let imports = vec![
            Import { alias: None, path: "context".into() },
            Import { alias: None, path: "database/sql".into() },
            Import { alias: None, path: "fmt".into() },
        ];
        let out = render(vec![f], imports, false);

        assert!(out.contains("import (\n\t\"context\"\n\t\"database/sql\"\n\t\"testing\"\n\n\t\"github.com/stretchr/testify/require\"\n)\n"), "{out}");
        assert!(!out.contains("\"fmt\""));
        assert!(out.contains("\ttype fields struct {\n\t\tdb      *sql.DB\n\t\tretries int\n\t}\n"), "{out}");
        assert!(out.contains("\t\twantErr require.ErrorAssertionFunc\n"), "{out}");
        assert!(out.contains("\t\tname   string\n\t\tfields fields\n\t\targs   args\n\t\twant   want\n"), "{out}");
        assert!(out.contains("\t\t\ts := &Service{\n\t\t\t\tdb:      tt.fields.db,\n\t\t\t\tretries: tt.fields.retries,\n\t\t\t}\n"), "{out}");
        assert!(out.contains("\t\t\tgot, gotErr := s.Do(tt.args.ctx)\n"), "{out}");
        assert!(out.contains("\t\t\trequire.Equal(t, tt.want.want, got)\n\t\t\ttt.want.wantErr(t, gotErr)\n"), "{out}");
    }

    #[test]
    fn appended_output_has_no_header() {
        let out = render(vec![model::Fn::new("Reset")], vec![], true);
        assert!(out.starts_with("func Test_Reset(t *testing.T) {\n"));
        assert!(!out.contains("package"));
        assert!(!out.contains("import"));
        assert!(out.contains("\t\t\tReset()\n"));
        assert!(out.contains("\t\tname string\n\t}{\n"));
    }

    #[test]
    fn function_without_results_imports_only_testing() {
        let out = render(vec![model::Fn::new("Reset")], vec![], false);
        assert!(out.contains("import (\n\t\"testing\"\n)\n"), "{out}");
    }

    #[test]
    fn value_receiver_without_fields() {
        let mut f = model::Fn::new("Norm");
        f.receiver = Some(id("", "Point"));
        f.results = vec![id("want", "float64")];
        f.receiver_struct = Some(Struct { name: "Point".into(), generics: vec![], fields: vec![] });
        let out = render(vec![f], vec![], true);
        assert!(out.contains("\t\t\tp := Point{}\n\n\t\t\tgot := p.Norm()\n"), "{out}");
        assert!(!out.contains("type fields"));
    }

    #[test]
    fn generic_function_and_variadic_args() {
        let mut f = model::Fn::new("Sum");
        f.generics = vec![id("T", "~int | ~float64")];
        f.args = vec![id("base", "T"), id("xs", "...T")];
        f.results = vec![id("want", "T")];
        let out = render(vec![f], vec![], true);
        assert!(out.contains("\t\tbase any\n\t\txs   []any\n"), "{out}");
        assert!(out.contains("\t\twant any\n"), "{out}");
        assert!(out.contains("got := Sum[any](tt.args.base, tt.args.xs...)"), "{out}");
    }

    #[test]
    fn generic_receiver_is_instantiated() {
        let mut f = model::Fn::new("Push");
        f.receiver = Some(id("s", "*Stack[E]"));
        f.args = vec![id("v", "E")];
        f.receiver_struct = Some(Struct {
            name: "Stack".into(),
            generics: vec![id("T", "any")],
            fields: vec![id("items", "[]T")],
        });
        let out = render(vec![f], vec![], true);
        assert!(out.contains("\t\titems []any\n"), "{out}");
        assert!(out.contains("\t\tv any\n"), "{out}");
        assert!(out.contains("s := &Stack[any]{\n"), "{out}");
        assert!(out.contains("\t\t\ts.Push(tt.args.v)\n"), "{out}");
    }

    #[test]
    fn receiver_named_t_is_renamed() {
        let mut f = model::Fn::new("Run");
        f.receiver = Some(id("t", "*Task"));
        f.receiver_struct = Some(Struct { name: "Task".into(), generics: vec![], fields: vec![] });
        let out = render(vec![f], vec![], true);
        assert!(out.contains("sut := &Task{}"), "{out}");
        assert!(out.contains("sut.Run()"), "{out}");
    }

    #[test]
    fn results_named_like_test_locals_are_rebound() {
        let mut f = model::Fn::new("Pos");
        f.results = vec![id("t", "int"), id("tt", "string"), id("err", "error")];
        let out = render(vec![f], vec![], true);
        assert!(out.contains("\t\t\tgotT, gotTt, err := Pos()\n"), "{out}");
        assert!(out.contains("\t\t\trequire.Equal(t, tt.want.t, gotT)\n"), "{out}");
        assert!(out.contains("\t\t\trequire.Equal(t, tt.want.tt, gotTt)\n"), "{out}");
        assert!(out.contains("\t\t\ttt.want.err(t, err)\n"), "{out}");
        assert!(!out.contains("\tt, "), "{out}");
    }

    #[test]
    fn functions_separated_by_blank_line() {
        let out = render(vec![model::Fn::new("A"), model::Fn::new("B")], vec![], true);
        assert!(out.contains("}\n\nfunc Test_B("), "{out}");
    }

    #[test]
    fn aliased_and_versioned_imports() {
        let mut f = model::Fn::new("Load");
        f.args = vec![id("n", "yaml.Node"), id("c", "cfg.Config"), id("l", "*zap.Logger")];
        let imports = vec![
            Import { alias: None, path: "gopkg.in/yaml.v3".into() },
            Import { alias: Some("cfg".into()), path: "example.com/app/config".into() },
            Import { alias: None, path: "go.uber.org/zap/v2".into() },
            Import { alias: Some("_".into()), path: "embed".into() },
            Import { alias: None, path: "example.com/unused".into() },
        ];
        let out = render(vec![f], imports, false);
        assert!(out.contains("\tcfg \"example.com/app/config\"\n"), "{out}");
        assert!(out.contains("\t\"gopkg.in/yaml.v3\"\n"), "{out}");
        assert!(out.contains("\t\"go.uber.org/zap/v2\"\n"), "{out}");
        assert!(!out.contains("embed"), "{out}");
        assert!(!out.contains("unused"), "{out}");
    }

    #[test]
    fn package_names_from_paths() {
        assert_eq!(package_name("fmt"), "fmt");
        assert_eq!(package_name("net/http"), "http");
        assert_eq!(package_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(package_name("github.com/jackc/pgx/v5"), "pgx");
        assert_eq!(package_name("example.com/v2ray"), "v2ray");
    }

    #[test]
    fn qualifier_detection_ignores_selectors() {
        assert!(uses_qualifier("map[string]*http.Request", "http"));
        assert!(!uses_qualifier("x.http.Request", "http"));
        assert!(!uses_qualifier("httpx.Client", "http"));
        assert!(!uses_qualifier("http", "http"));
    }

    #[test]
    fn instantiate_replaces_only_type_params() {
        let params = vec!["K".to_string(), "V".to_string()];
        assert_eq!(instantiate("map[K][]V", &params), "map[any][]any");
        assert_eq!(instantiate("pkg.K", &params), "pkg.K");
        assert_eq!(instantiate("Key", &params), "Key");
    }
}
