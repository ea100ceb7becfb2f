use crate::ast::SourceMap;
use super::{Diagnostic, Severity};

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn bold(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_red(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;31m{s}\x1b[0m") } else { s.to_string() }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[36m{s}\x1b[0m") } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[2m{s}\x1b[0m") } else { s.to_string() }
    }

    pub fn render(&self, d: &Diagnostic) -> String {
        let mut out = String::new();

        // "error[GGT-P003]: message"
        let severity = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let heading = match d.code {
            Some(code) => format!("{severity}[{code}]"),
            None => severity.to_string(),
        };
        let severity_label = match d.severity {
            Severity::Error => self.bold_red(&heading),
            Severity::Warning => self.bold(&self.cyan(&heading)),
        };
        out.push_str(&format!("{}: {}\n", severity_label, self.bold(&d.message)));

        // Render primary label with source snippet
        let primary = d.labels.iter().find(|l| l.is_primary);
        if let (Some(label), Some(source)) = (primary, &d.source) {
            let map = SourceMap::new(source);
            let (line, col) = map.lookup(label.span.start);
            let line_text = map.line_text(source, line);

            // "  --> path:line:col"
            let location = match &d.path {
                Some(path) => format!("{path}:{line}:{col}"),
                None => format!("{line}:{col}"),
            };
            out.push_str(&format!("  {} {}\n", self.cyan("-->"), location));

            // Gutter width based on line number digits
            let gutter = line.to_string().len();
            let pipe = self.cyan("|");
            let pad = " ".repeat(gutter);

            // Empty gutter line
            out.push_str(&format!("{pad} {pipe}\n"));

            // Source line
            let line_num = self.cyan(&format!("{line:>gutter$}"));
            out.push_str(&format!("{line_num} {pipe} {line_text}\n"));

            // Caret line
            let span_start_in_line = col.saturating_sub(1);
            let span_len = (label.span.end.saturating_sub(label.span.start)).max(1);
            let carets = self.bold_red(&"^".repeat(span_len));
            let indent = " ".repeat(span_start_in_line);
            if label.message.is_empty() {
                out.push_str(&format!("{pad} {pipe} {indent}{carets}\n"));
            } else {
                out.push_str(&format!("{pad} {pipe} {indent}{carets} {}\n",
                    self.bold_red(&label.message)));
            }

            // Empty gutter line after
            out.push_str(&format!("{pad} {pipe}\n"));
        }

        // No snippet to show, but the file is still worth naming
        if d.source.is_none() {
            if let Some(path) = &d.path {
                out.push_str(&format!("  {} {}\n", self.cyan("-->"), path));
            }
        }

        // Notes
        for note in &d.notes {
            out.push_str(&format!("  {} note: {}\n", self.dim("="), note));
        }

        // Suggestion
        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!("  {} suggestion: {}\n", self.dim("="), suggestion));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use std::path::Path;

    const SRC: &str = "package p\n\nfunc (a int, b) X() {}\n";

    fn make_diag(start: usize, end: usize) -> Diagnostic {
        Diagnostic::error("mixed named and unnamed parameters")
            .with_code("GGT-P005")
            .with_span(Span { start, end }, "here")
            .with_source(SRC)
            .with_path(Path::new("svc/a.go"))
            .with_note("in receiver")
            .with_suggestion("name every parameter")
    }

    #[test]
    fn render_contains_code_and_message() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(16, 17));
        assert!(out.starts_with("error[GGT-P005]: mixed named and unnamed parameters\n"), "{out}");
    }

    #[test]
    fn render_contains_path_line_col() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(16, 17));
        assert!(out.contains("--> svc/a.go:3:6"), "missing location in:\n{out}");
    }

    #[test]
    fn render_contains_source_line_and_carets() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(24, 25));
        assert!(out.contains("3 | func (a int, b) X() {}"), "missing source line in:\n{out}");
        // `b` sits at column 14
        let caret_line = format!(" | {}^ here", " ".repeat(13));
        assert!(out.contains(&caret_line), "misplaced caret in:\n{out}");
    }

    #[test]
    fn render_contains_note_and_suggestion() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(16, 17));
        assert!(out.contains("= note: in receiver"), "{out}");
        assert!(out.contains("= suggestion: name every parameter"), "{out}");
    }

    #[test]
    fn render_no_source_names_path() {
        let r = AnsiRenderer { use_color: false };
        let d = Diagnostic::error("failed to read x.go").with_path(Path::new("x.go"));
        let out = r.render(&d);
        assert!(out.starts_with("error: failed to read x.go\n"));
        assert!(out.contains("--> x.go\n"));
        assert!(!out.contains(" | "));
    }

    #[test]
    fn render_warning_heading() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&Diagnostic::warning("gofmt not found"));
        assert!(out.starts_with("warning: gofmt not found"));
    }

    #[test]
    fn render_with_color_contains_ansi_codes() {
        let r = AnsiRenderer { use_color: true };
        let out = r.render(&make_diag(16, 17));
        assert!(out.contains("\x1b["), "expected ANSI codes when use_color=true");
    }

    #[test]
    fn render_without_color_no_ansi_codes() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag(16, 17));
        assert!(!out.contains("\x1b["), "unexpected ANSI codes when use_color=false");
    }

    #[test]
    fn caret_length_matches_span() {
        let r = AnsiRenderer { use_color: false };
        // span covers `a int`
        let out = r.render(&make_diag(17, 22));
        assert!(out.contains("^^^^^"), "expected 5 carets in:\n{out}");
    }
}
