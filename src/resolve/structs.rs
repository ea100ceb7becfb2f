use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{GenerateError, load};
use crate::ast::SourceFile;
use crate::extract;
use crate::model::{self, Struct};

/// Attaches receiver struct definitions to methods, searching the input file
/// first and then the other files of its package one at a time.
///
/// Only the most recently parsed sibling is kept; the next one replaces it.
pub struct StructResolver<'a> {
    input_path: &'a Path,
    input: &'a SourceFile,
    current: Option<(PathBuf, SourceFile)>,
}

impl<'a> StructResolver<'a> {
    pub fn new(input_path: &'a Path, input: &'a SourceFile) -> Self {
        StructResolver { input_path, input, current: None }
    }

    /// Path of the sibling file held in the cache, if any.
    #[cfg(test)]
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|(p, _)| p.as_path())
    }

    pub fn resolve(&mut self, fns: &mut [model::Fn]) -> Result<(), GenerateError> {
        // test name -> index of the method still waiting for its struct
        let mut pending: BTreeMap<String, usize> = fns
            .iter()
            .enumerate()
            .filter(|(_, f)| f.receiver.is_some() && f.receiver_struct.is_none())
            .map(|(i, f)| (f.test_name(), i))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        attach(self.input, &mut pending, fns);
        if pending.is_empty() {
            return Ok(());
        }

        let dir = match self.input_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        for path in package_files(&dir, self.input_path)? {
            let file = load(&path)?;
            if file.package.as_str() != self.input.package.as_str() {
                debug!(path = %path.display(), package = %file.package.as_str(), "skipping file from another package");
                continue;
            }
            debug!(path = %path.display(), "parsed package file");
            let (_, cached) = self.current.insert((path, file));
            attach(cached, &mut pending, fns);
            if pending.is_empty() {
                return Ok(());
            }
        }

        Err(GenerateError::UnresolvedStructs { tests: pending.into_keys().collect() })
    }
}

fn attach(file: &SourceFile, pending: &mut BTreeMap<String, usize>, fns: &mut [model::Fn]) {
    let by_name: HashMap<String, Struct> =
        extract::structs(file).into_iter().map(|s| (s.name.clone(), s)).collect();
    if by_name.is_empty() {
        return;
    }
    pending.retain(|test, idx| {
        let f = &mut fns[*idx];
        let found = f.receiver_type_name().and_then(|name| by_name.get(name)).cloned();
        match found {
            Some(s) => {
                debug!(test = %test, name = %s.name, "attached receiver struct");
                f.receiver_struct = Some(s);
                false
            }
            None => true,
        }
    });
}

/// Go files in `dir` other than `input` and test files, sorted by name.
fn package_files(dir: &Path, input: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let input_name = input.file_name();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| GenerateError::ListPackage { dir: dir.to_path_buf(), source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if Some(entry.file_name()) == input_name || !name.ends_with(".go") || name.ends_with("_test.go") {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}
