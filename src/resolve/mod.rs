//! Finds the functions of an input file that have no test yet.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ast::SourceFile;
use crate::config::Config;
use crate::extract;
use crate::model::{self, File, naming};
use crate::parser::{self, SyntaxError};

pub mod structs;

pub use structs::StructResolver;

/// Result of a generation run that did not fail.
#[derive(Debug)]
pub enum Generation {
    /// Functions that need a test, with receivers resolved.
    Missing(File),
    /// Every candidate function already has a test.
    UpToDate,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        /// Full text of the file, for source snippets.
        text: String,
        #[source]
        source: SyntaxError,
    },
    #[error("functions {first:?} and {second:?} both map to test {test}")]
    DuplicateTestName {
        test: String,
        first: String,
        second: String,
    },
    #[error("missing structs for the following methods: {}", tests.join(", "))]
    UnresolvedStructs { tests: Vec<String> },
    #[error("failed to list package files in {}: {source}", dir.display())]
    ListPackage {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl GenerateError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Read { .. } => "GGT-I001",
            GenerateError::ListPackage { .. } => "GGT-I002",
            GenerateError::Syntax { source: SyntaxError::Lex(_), .. } => "GGT-L001",
            GenerateError::Syntax { source: SyntaxError::Parse(errors), .. } => {
                errors.first().map(|e| e.code).unwrap_or("GGT-P001")
            }
            GenerateError::DuplicateTestName { .. } => "GGT-R001",
            GenerateError::UnresolvedStructs { .. } => "GGT-R002",
        }
    }
}

/// Read and parse one Go file, keeping the path in any error.
pub(crate) fn load(path: &Path) -> Result<SourceFile, GenerateError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| GenerateError::Read { path: path.to_path_buf(), source })?;
    parser::parse_source(&text).map_err(|source| GenerateError::Syntax {
        path: path.to_path_buf(),
        text,
        source,
    })
}

/// Like [`load`], but a missing file is `Ok(None)`.
fn load_existing(path: &Path) -> Result<Option<SourceFile>, GenerateError> {
    match load(path) {
        Ok(file) => Ok(Some(file)),
        Err(GenerateError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Functions a test cannot call by name: blank functions and methods, and
/// package `init` functions. A method may be called `init`.
fn is_testable(f: &model::Fn) -> bool {
    f.name != "_" && (f.receiver.is_some() || f.name != "init")
}

pub struct Generator<'a> {
    config: &'a Config,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Generator { config }
    }

    /// Compute the functions of the input file that have no test in the
    /// output file, keeping input order. Every filter must accept a function
    /// for it to be considered; `--run` from the config is applied as one
    /// more filter.
    pub fn generate_missing_tests(
        &self,
        filters: &[&dyn Fn(&model::Fn) -> bool],
    ) -> Result<Generation, GenerateError> {
        let input = load(&self.config.input)?;
        let output = load_existing(&self.config.output)?;
        info!(path = %self.config.input.display(), package = %input.package.as_str(), "parsed input file");
        if output.is_some() {
            debug!(path = %self.config.output.display(), "existing test file found");
        }

        let candidates: Vec<model::Fn> = extract::functions(&input)
            .into_iter()
            .filter(is_testable)
            .map(|mut f| {
                naming::assign_friendly_names(&mut f.args);
                naming::assign_friendly_names(&mut f.results);
                f
            })
            .filter(|f| filters.iter().all(|accept| accept(f)))
            .filter(|f| self.config.run.as_ref().is_none_or(|re| re.is_match(&f.test_name())))
            .collect();
        check_unique_test_names(&candidates)?;

        let existing: HashSet<String> = output
            .as_ref()
            .map(|out| extract::functions(out).into_iter().map(|f| f.name).collect())
            .unwrap_or_default();

        let mut missing: Vec<model::Fn> = candidates
            .into_iter()
            .filter(|f| !existing.contains(&f.test_name()))
            .collect();
        if missing.is_empty() {
            return Ok(Generation::UpToDate);
        }

        StructResolver::new(&self.config.input, &input).resolve(&mut missing)?;

        info!(count = missing.len(), "tests to generate");
        let appending = output.is_some();
        Ok(Generation::Missing(File {
            package_name: input.package.node.clone(),
            imports: if appending { Vec::new() } else { extract::imports(&input) },
            functions: missing,
            appending,
        }))
    }
}

fn check_unique_test_names(fns: &[model::Fn]) -> Result<(), GenerateError> {
    let mut seen: Vec<(String, &model::Fn)> = Vec::with_capacity(fns.len());
    for f in fns {
        let test = f.test_name();
        if let Some((_, first)) = seen.iter().find(|(t, _)| *t == test) {
            return Err(GenerateError::DuplicateTestName {
                test,
                first: display_name(first),
                second: display_name(f),
            });
        }
        seen.push((test, f));
    }
    Ok(())
}

fn display_name(f: &model::Fn) -> String {
    match f.receiver_type_name() {
        Some(recv) => format!("{recv}.{}", f.name),
        None => f.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    fn config(dir: &tempfile::TempDir, input: &str) -> Config {
        Config::new(Some(dir.path().join(input)), None, None).unwrap()
    }

    fn missing(generation: Generation) -> File {
        match generation {
            Generation::Missing(file) => file,
            Generation::UpToDate => panic!("expected missing tests"),
        }
    }

    fn test_names(file: &File) -> Vec<String> {
        file.functions.iter().map(|f| f.test_name()).collect()
    }

    #[test]
    fn all_functions_missing_without_output() {
        let dir = setup(&[(
            "calc.go",
            "package calc\n\nimport \"fmt\"\n\nfunc Add(a, b int) int { return a + b }\nfunc Sub(a, b int) int { return a - b }\n",
        )]);
        let c = config(&dir, "calc.go");
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        assert_eq!(test_names(&file), vec!["Test_Add", "Test_Sub"]);
        assert_eq!(file.package_name, "calc");
        assert!(!file.appending);
        assert_eq!(file.imports.len(), 1);
    }

    #[test]
    fn existing_tests_are_skipped_and_imports_dropped() {
        let dir = setup(&[
            ("calc.go", "package calc\nimport \"fmt\"\nfunc Add(a, b int) int { return a + b }\nfunc Sub(a, b int) int { return a - b }\n"),
            ("calc_test.go", "package calc\nimport \"testing\"\nfunc Test_Add(t *testing.T) {}\n"),
        ]);
        let c = config(&dir, "calc.go");
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        assert_eq!(test_names(&file), vec!["Test_Sub"]);
        assert!(file.appending);
        assert!(file.imports.is_empty());
    }

    #[test]
    fn up_to_date_when_everything_tested() {
        let dir = setup(&[
            ("calc.go", "package calc\nfunc Add(a, b int) int { return a + b }\n"),
            ("calc_test.go", "package calc\nfunc Test_Add(t *testing.T) {}\n"),
        ]);
        let c = config(&dir, "calc.go");
        assert!(matches!(Generator::new(&c).generate_missing_tests(&[]).unwrap(), Generation::UpToDate));
    }

    #[test]
    fn results_get_friendly_names() {
        let dir = setup(&[("f.go", "package p\nfunc Parse(string) (int, string, error) { return 0, \"\", nil }\n")]);
        let c = config(&dir, "f.go");
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        let f = &file.functions[0];
        assert_eq!(f.args[0].name, "want");
        let names: Vec<_> = f.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["want1", "want2", "wantErr"]);
    }

    #[test]
    fn filters_must_all_accept() {
        let dir = setup(&[("f.go", "package p\nfunc A() {}\nfunc B() {}\nfunc C() {}\n")]);
        let c = config(&dir, "f.go");
        let not_a = |f: &model::Fn| f.name != "A";
        let not_c = |f: &model::Fn| f.name != "C";
        let file = missing(Generator::new(&c).generate_missing_tests(&[&not_a, &not_c]).unwrap());
        assert_eq!(test_names(&file), vec!["Test_B"]);
    }

    #[test]
    fn run_pattern_filters_by_test_name() {
        let dir = setup(&[("f.go", "package p\ntype S struct{}\nfunc (s S) Do() {}\nfunc Do() {}\n")]);
        let c = Config::new(Some(dir.path().join("f.go")), None, Some("^Test_S_")).unwrap();
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        assert_eq!(test_names(&file), vec!["Test_S_Do"]);
    }

    #[test]
    fn init_and_blank_functions_ignored() {
        let dir = setup(&[(
            "f.go",
            "package p\nfunc init() {}\nfunc _() {}\nfunc init() {}\nfunc Run() {}\ntype S struct{}\nfunc (s S) _() {}\nfunc (s S) init() {}\n",
        )]);
        let c = config(&dir, "f.go");
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        assert_eq!(test_names(&file), vec!["Test_Run", "Test_S_init"]);
    }

    #[test]
    fn duplicate_test_names_rejected() {
        let dir = setup(&[(
            "f.go",
            "package p\ntype S struct{}\nfunc (s S) Do() {}\nfunc (s *S) Do() {}\n",
        )]);
        let c = config(&dir, "f.go");
        let err = Generator::new(&c).generate_missing_tests(&[]).unwrap_err();
        assert_eq!(err.code(), "GGT-R001");
        assert!(err.to_string().contains("Test_S_Do"));
    }

    #[test]
    fn missing_input_is_read_error() {
        let dir = setup(&[]);
        let c = config(&dir, "nope.go");
        let err = Generator::new(&c).generate_missing_tests(&[]).unwrap_err();
        assert!(matches!(err, GenerateError::Read { .. }));
        assert_eq!(err.code(), "GGT-I001");
    }

    #[test]
    fn input_parse_error_is_fatal() {
        let dir = setup(&[("f.go", "package p\nfunc (a int, string) {}\n")]);
        let c = config(&dir, "f.go");
        let err = Generator::new(&c).generate_missing_tests(&[]).unwrap_err();
        assert!(matches!(err, GenerateError::Syntax { .. }));
        assert!(err.code().starts_with("GGT-P"));
    }

    #[test]
    fn output_parse_error_is_fatal() {
        let dir = setup(&[
            ("f.go", "package p\nfunc A() {}\n"),
            ("f_test.go", "package p\nfunc Test_A( {\n"),
        ]);
        let c = config(&dir, "f.go");
        let err = Generator::new(&c).generate_missing_tests(&[]).unwrap_err();
        match err {
            GenerateError::Syntax { path, .. } => assert!(path.ends_with("f_test.go")),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn method_receivers_resolved_from_input() {
        let dir = setup(&[(
            "svc.go",
            "package svc\ntype Service struct {\n\tdb string\n}\nfunc (s *Service) Do() error { return nil }\n",
        )]);
        let c = config(&dir, "svc.go");
        let file = missing(Generator::new(&c).generate_missing_tests(&[]).unwrap());
        let s = file.functions[0].receiver_struct.as_ref().unwrap();
        assert_eq!(s.name, "Service");
        assert_eq!(s.fields[0].name, "db");
    }
}
