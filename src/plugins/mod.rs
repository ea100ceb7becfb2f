//! Result plugins: rewrite result types and produce the lines that check
//! each result after the call under test.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::model::{self, File, Identifier, Import, naming};

/// Verification lines keyed by result name, kept in first-insertion order.
/// A later plugin replaces the lines an earlier one stored for a name.
#[derive(Debug, Default)]
pub struct Verifications {
    entries: IndexMap<String, Vec<String>>,
}

impl Verifications {
    pub fn set(&mut self, name: &str, lines: Vec<String>) {
        self.entries.insert(name.to_string(), lines);
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// All groups, each newline-joined, joined by newlines.
    pub fn render(&self) -> String {
        self.entries
            .values()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub trait ResultPlugin {
    fn name(&self) -> &'static str;

    /// Rewrite result identifiers for this plugin's style of checking.
    fn patch(&self, results: Vec<Identifier>) -> Vec<Identifier>;

    /// Record the check for each result this plugin handles.
    fn verify(&self, results: &[Identifier], acc: &mut Verifications);
}

/// Names the generated test body already binds around the call.
pub const RESERVED_LOCALS: &[&str] = &["t", "tt", "testcases"];

/// `want` prefix becomes `got`: `wantErr2` is checked against `gotErr2`.
/// A result named like one of the test's own locals is bound as `gotT`,
/// `gotTt`, ... so it cannot shadow them.
pub fn to_got(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(naming::WANT) {
        return format!("got{rest}");
    }
    if RESERVED_LOCALS.contains(&name) {
        let mut chars = name.chars();
        let head: String = chars.next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
        return format!("got{head}{}", chars.as_str());
    }
    name.to_string()
}

/// Compares every result with `require.Equal`.
pub struct CorePlugin;

impl ResultPlugin for CorePlugin {
    fn name(&self) -> &'static str {
        "core"
    }

    fn patch(&self, results: Vec<Identifier>) -> Vec<Identifier> {
        results
    }

    fn verify(&self, results: &[Identifier], acc: &mut Verifications) {
        for r in results {
            acc.set(&r.name, vec![format!("require.Equal(t, tt.want.{}, {})", r.name, to_got(&r.name))]);
        }
    }
}

pub const ERROR_ASSERTION_TYPE: &str = "require.ErrorAssertionFunc";

/// Turns `error` results into `require.ErrorAssertionFunc` test inputs that
/// are called with the returned error.
pub struct ErrorAssertionPlugin;

impl ResultPlugin for ErrorAssertionPlugin {
    fn name(&self) -> &'static str {
        "error-assertion"
    }

    fn patch(&self, results: Vec<Identifier>) -> Vec<Identifier> {
        results
            .into_iter()
            .map(|mut r| {
                if r.ty == naming::ERROR_TYPE {
                    r.ty = ERROR_ASSERTION_TYPE.to_string();
                }
                r
            })
            .collect()
    }

    fn verify(&self, results: &[Identifier], acc: &mut Verifications) {
        for r in results.iter().filter(|r| r.ty == naming::ERROR_TYPE) {
            acc.set(&r.name, vec![format!("tt.want.{}(t, {})", r.name, to_got(&r.name))]);
        }
    }
}

/// Ordered list of result plugins. Each plugin verifies the results as the
/// previous plugin left them, then patches them for the next.
pub struct Pipeline {
    plugins: Vec<Box<dyn ResultPlugin>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(vec![Box::new(CorePlugin), Box::new(ErrorAssertionPlugin)])
    }
}

impl Pipeline {
    pub fn new(plugins: Vec<Box<dyn ResultPlugin>>) -> Self {
        Pipeline { plugins }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Replace `func.results` with the patched list and return the
    /// verification block.
    pub fn run(&self, func: &mut model::Fn) -> String {
        let mut acc = Verifications::default();
        let mut results = std::mem::take(&mut func.results);
        for plugin in &self.plugins {
            plugin.verify(&results, &mut acc);
            results = plugin.patch(results);
        }
        func.results = results;
        acc.render()
    }

    pub fn apply(&self, file: File) -> PluggableFile {
        debug!(plugins = ?self.names(), "running result plugins");
        let functions = file
            .functions
            .into_iter()
            .map(|mut func| {
                let verification = self.run(&mut func);
                PluggableFn { func, verification }
            })
            .collect();
        PluggableFile {
            package_name: file.package_name,
            imports: file.imports,
            functions,
            appending: file.appending,
        }
    }
}

/// A `File` after the plugins ran: what the renderer consumes.
#[derive(Debug, Clone, Serialize)]
pub struct PluggableFile {
    pub package_name: String,
    pub imports: Vec<Import>,
    pub functions: Vec<PluggableFn>,
    pub appending: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluggableFn {
    #[serde(flatten)]
    pub func: model::Fn,
    pub verification: String,
}

impl PluggableFn {
    pub fn test_name(&self) -> String {
        self.func.test_name()
    }

    pub fn arg_names(&self) -> Vec<&str> {
        self.func.args.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn result_names(&self) -> Vec<&str> {
        self.func.results.iter().map(|r| r.name.as_str()).collect()
    }

    /// Variables the call results are bound to.
    pub fn got_names(&self) -> Vec<String> {
        self.func.results.iter().map(|r| to_got(&r.name)).collect()
    }

    /// Receiver struct fields; empty for functions.
    pub fn fields(&self) -> &[Identifier] {
        self.func.receiver_struct.as_ref().map(|s| s.fields.as_slice()).unwrap_or(&[])
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    /// `[any, any]` for a generic function, empty otherwise.
    pub fn generic_args(&self) -> String {
        any_args(self.func.generics.len())
    }

    /// `tt.args.a, tt.args.rest...`
    pub fn call_args(&self) -> String {
        self.func
            .args
            .iter()
            .map(|a| {
                if a.ty.starts_with("...") {
                    format!("tt.args.{}...", a.name)
                } else {
                    format!("tt.args.{}", a.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_method(&self) -> bool {
        self.func.receiver.is_some()
    }
}

/// `[any, ...]` with `n` entries, or nothing when `n` is 0.
pub fn any_args(n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    format!("[{}]", vec!["any"; n].join(", "))
}
