/// Maps byte offsets to line/column positions within a Go source file.
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        SourceMap { line_starts }
    }

    /// Returns (line, col), both 1-based. Columns count bytes, like gc's
    /// `file:line:col` positions.
    pub fn lookup(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line + 1, col + 1)
    }

    /// Returns the text of the given 1-based line without its line break.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        if line == 0 || line > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line - 1];
        let end = self.line_starts.get(line).copied().unwrap_or(source.len());
        source[start..end].trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "package p\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n";

    #[test]
    fn first_line() {
        let sm = SourceMap::new(SRC);
        assert_eq!(sm.lookup(0), (1, 1));
        assert_eq!(sm.lookup(8), (1, 9));
    }

    #[test]
    fn blank_line_and_func_header() {
        let sm = SourceMap::new(SRC);
        assert_eq!(sm.lookup(10), (2, 1));
        // `Add` starts at byte 16
        assert_eq!(sm.lookup(16), (3, 6));
    }

    #[test]
    fn line_text_strips_break() {
        let sm = SourceMap::new(SRC);
        assert_eq!(sm.line_text(SRC, 3), "func Add(a, b int) int {");
        assert_eq!(sm.line_text(SRC, 2), "");
    }

    #[test]
    fn crlf_line_text() {
        let src = "package p\r\nfunc F()\r\n";
        let sm = SourceMap::new(src);
        assert_eq!(sm.line_text(src, 2), "func F()");
    }

    #[test]
    fn out_of_bounds_lines_are_empty() {
        let sm = SourceMap::new(SRC);
        assert_eq!(sm.line_text(SRC, 0), "");
        assert_eq!(sm.line_text(SRC, 99), "");
    }

    #[test]
    fn empty_source() {
        let sm = SourceMap::new("");
        assert_eq!(sm.lookup(0), (1, 1));
        assert_eq!(sm.line_text("", 1), "");
    }
}
