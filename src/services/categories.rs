/// Canonical form of a category string: trimmed and lowercased.
///
/// Applied at every write path and at read-time matching, so "Food",
/// " food " and "FOOD" all land in the same bucket.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize(" Food "), "food");
        assert_eq!(normalize("FOOD"), "food");
        assert_eq!(normalize("\tGroceries\n"), "groceries");
    }

    #[test]
    fn idempotent() {
        for raw in [" Food ", "FOOD", "food", "  ", "", "Café "] {
            assert_eq!(normalize(&normalize(raw)), normalize(raw));
        }
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(normalize("   "), "");
    }
}
