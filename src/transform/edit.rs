//! Span-based text edits.

/// Replace `source[start..end]` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

impl Edit {
    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    pub fn remove(start: u32, end: u32) -> Self {
        Self::replace(start, end, String::new())
    }
}

/// Apply non-overlapping edits. Edits at the same offset keep their order.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in edits {
        let (start, end) = (edit.start as usize, edit.end as usize);
        if start < cursor {
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.text);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edits_mixed() {
        let source = "import a from 'a'\nimport b from 'b'\n";
        let edits = vec![
            Edit::replace(33, 34, "c"),
            Edit::insert(0, "// head\n"),
            Edit::remove(0, 18),
        ];
        assert_eq!(apply_edits(source, edits), "// head\nimport b from 'c'\n");
    }

    #[test]
    fn test_apply_edits_empty() {
        assert_eq!(apply_edits("abc", Vec::new()), "abc");
    }

    #[test]
    fn test_overlapping_edit_skipped() {
        let edits = vec![Edit::replace(0, 3, "x"), Edit::replace(1, 2, "y")];
        assert_eq!(apply_edits("abcd", edits), "xd");
    }
}
