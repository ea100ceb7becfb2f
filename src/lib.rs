//! Generate table-driven test skeletons for the functions and methods of a
//! Go file that have no test yet.
//!
//! The pipeline: [`parser`] reads Go declarations, [`extract`] turns them
//! into the [`model`], [`resolve`] works out which tests are missing and
//! finds receiver structs, [`plugins`] decide how results are checked, and
//! [`codegen`] writes the `_test.go` file.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod extract;
pub mod lexer;
pub mod model;
pub mod observability;
pub mod parser;
pub mod plugins;
pub mod resolve;
