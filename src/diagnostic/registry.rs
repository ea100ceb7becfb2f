/// An entry in the error code registry.
pub struct ErrorEntry {
    pub code: &'static str,
    pub short: &'static str,  // one line, for `--explain` headings
    pub long: &'static str,   // full explanation for --explain
}

/// All stable error codes reported by ggt.
pub static REGISTRY: &[ErrorEntry] = &[
    // ── Lexer ────────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "GGT-L001",
        short: "unexpected character",
        long: r#"## GGT-L001: unexpected character

A character was found that cannot start any Go token.

**Example:**

    func Add(a, b int) int { return a # b }

ggt only reads declarations, but it still has to tokenize the whole file.
Check that the input is a Go source file and that it builds with `go vet`.
"#,
    },

    // ── Parser ───────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "GGT-P001",
        short: "expected declaration",
        long: r#"## GGT-P001: expected declaration

A token was found at the top level where `func`, `type`, `var`, `const`
or `import` was expected.

**Common causes:**
- A stray closing brace left over from an edit
- Statements written outside of any function
"#,
    },
    ErrorEntry {
        code: "GGT-P002",
        short: "unexpected token",
        long: r#"## GGT-P002: unexpected token

A specific token (a bracket, a parenthesis, a semicolon) was expected
and something else was found.

**Example:**

    func Add(a, b int int {}

The parameter list is missing its closing `)`.
"#,
    },
    ErrorEntry {
        code: "GGT-P003",
        short: "expected identifier",
        long: r#"## GGT-P003: expected identifier

A name was expected: a function name, a type name, a parameter name or
a struct field name.

**Example:**

    func 1() {}
"#,
    },
    ErrorEntry {
        code: "GGT-P004",
        short: "expected type",
        long: r#"## GGT-P004: expected type

A type expression was expected, for example after a parameter name or a
struct field name.

**Example:**

    type T struct {
        a =
    }
"#,
    },
    ErrorEntry {
        code: "GGT-P005",
        short: "mixed named and unnamed parameters",
        long: r#"## GGT-P005: mixed named and unnamed parameters

In Go, either every parameter in a list has a name or none does.

**Example that triggers this:**

    func (a int, b) X() {}

**Fix:**

    func (a int, b string) X() {}
"#,
    },
    ErrorEntry {
        code: "GGT-P006",
        short: "missing package clause",
        long: r#"## GGT-P006: missing package clause

Every Go file starts with `package <name>`. The package name is copied
into the generated test file, so it cannot be guessed.

**Fix:** add `package mypkg` as the first line of the file.
"#,
    },
    ErrorEntry {
        code: "GGT-P007",
        short: "expected import path",
        long: r#"## GGT-P007: expected import path

An import spec must contain a quoted path, optionally preceded by an
alias, `.` or `_`.

**Example that triggers this:**

    import fmt

**Fix:**

    import "fmt"
"#,
    },
    ErrorEntry {
        code: "GGT-P008",
        short: "type parameter without constraint",
        long: r#"## GGT-P008: type parameter without constraint

Every type parameter needs a constraint.

**Example that triggers this:**

    func Map[T](xs []T) []T

**Fix:**

    func Map[T any](xs []T) []T
"#,
    },
    ErrorEntry {
        code: "GGT-P009",
        short: "unterminated block",
        long: r#"## GGT-P009: unterminated block

A function body or a `var`/`const` declaration was opened but the file
ended before it was closed. Usually a `}` is missing.
"#,
    },
    ErrorEntry {
        code: "GGT-P010",
        short: "method must have exactly one receiver",
        long: r#"## GGT-P010: method must have exactly one receiver

A receiver list must declare exactly one receiver.

**Example that triggers this:**

    func (a, b *T) Do() {}
"#,
    },

    // ── Resolution ───────────────────────────────────────────────────────────
    ErrorEntry {
        code: "GGT-R001",
        short: "two functions map to the same test name",
        long: r#"## GGT-R001: two functions map to the same test name

Test names are built as `Test_<Receiver>_<Name>`. Two declarations
ended up with the same name, so one test would overwrite the other.

This happens with methods declared on both `T` and a generic `T[K]`
written in different files of a broken package.

**Fix:** use `--run` to select only one of them.
"#,
    },
    ErrorEntry {
        code: "GGT-R002",
        short: "receiver struct not found",
        long: r#"## GGT-R002: receiver struct not found

A method needs a test, but the struct it is declared on was not found in
the input file or in any other non-test `.go` file of the same directory
and package.

**Common causes:**
- The receiver is not a struct (`type Celsius float64`)
- The struct lives in a file of another package in the same directory

Only struct receivers are supported. Use `--run` to leave the other
methods out.
"#,
    },

    // ── I/O ──────────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "GGT-I001",
        short: "failed to read source file",
        long: r#"## GGT-I001: failed to read source file

The input file, or a sibling file searched for a receiver struct, could
not be read. Check that it exists and is readable.
"#,
    },
    ErrorEntry {
        code: "GGT-I002",
        short: "failed to list package directory",
        long: r#"## GGT-I002: failed to list package directory

While looking for a receiver struct, the directory containing the input
file could not be listed.
"#,
    },
    ErrorEntry {
        code: "GGT-I003",
        short: "failed to open output file",
        long: r#"## GGT-I003: failed to open output file

The test file could not be created or opened for appending. Check that
its directory exists and is writable.
"#,
    },
    ErrorEntry {
        code: "GGT-I004",
        short: "failed to write output file",
        long: r#"## GGT-I004: failed to write output file

The test file was opened but writing to it failed, for example because
the disk is full.
"#,
    },
    ErrorEntry {
        code: "GGT-I005",
        short: "failed to run gofmt",
        long: r#"## GGT-I005: failed to run gofmt

`gofmt` was found on `PATH` but could not be started. Pass `--no-fmt` to
skip formatting.
"#,
    },
    ErrorEntry {
        code: "GGT-I006",
        short: "gofmt rejected the generated file",
        long: r#"## GGT-I006: gofmt rejected the generated file

The test file was written but `gofmt` reported errors. When appending,
the existing part of the file may already have been invalid. The
message includes gofmt's own output.
"#,
    },

    // ── Configuration ────────────────────────────────────────────────────────
    ErrorEntry {
        code: "GGT-C001",
        short: "no input file given",
        long: r#"## GGT-C001: no input file given

Pass the Go file to generate tests for:

    ggt service.go
"#,
    },
    ErrorEntry {
        code: "GGT-C002",
        short: "input must be a .go file",
        long: r#"## GGT-C002: input must be a .go file

The input path must end in `.go`.
"#,
    },
    ErrorEntry {
        code: "GGT-C003",
        short: "output must be a _test.go file",
        long: r#"## GGT-C003: output must be a _test.go file

The output path must end in `_test.go` so the Go toolchain treats it as
a test file. When no output is given, `service.go` maps to
`service_test.go`.
"#,
    },
    ErrorEntry {
        code: "GGT-C004",
        short: "invalid --run pattern",
        long: r#"## GGT-C004: invalid --run pattern

The `--run` value must be a valid regular expression. It is matched
against test names such as `Test_Service_Do`.
"#,
    },
];

/// Look up an error entry by code (e.g. `"GGT-R002"`).
pub fn lookup(code: &str) -> Option<&'static ErrorEntry> {
    REGISTRY.iter().find(|e| e.code == code)
}
