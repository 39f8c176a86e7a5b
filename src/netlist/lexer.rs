//! Line tokenizer for the netlist grammar.
//!
//! The grammar is whitespace-separated tokens, one device per line; unlike
//! the DSL this replaces, there is no nested expression syntax, so a line
//! is fully described by its trimmed, split token list and its 1-indexed
//! source line number.

/// One non-blank, non-comment netlist line, already split into tokens.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub number: usize,
    pub tokens: Vec<&'a str>,
}

/// Split `source` into tokenized lines, dropping blank lines, `*` comments,
/// and `.` directives other than `.TRAN` (case-insensitive).
pub fn tokenize(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        if trimmed.starts_with('.') && !trimmed[1..].to_uppercase().starts_with("TRAN") {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        lines.push(Line {
            number: idx + 1,
            tokens,
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_comments_and_blank_lines() {
        let src = "10\n* a comment\n\nR1 1 2 1e3\n.MODEL foo\n.TRAN 1 10 BE 1\n";
        let lines = tokenize(src);
        assert_eq!(lines.len(), 3); // "10", "R1 1 2 1e3", ".TRAN ..."
        assert_eq!(lines[1].tokens, vec!["R1", "1", "2", "1e3"]);
    }
}
