/// Drop empty and whitespace-only lines from a model answer, keeping the
/// remaining lines in order.
pub fn clean_answer(raw: &str) -> String {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_removed() {
        assert_eq!(clean_answer("a\n\n\nb\n \nc"), "a\nb\nc");
    }

    #[test]
    fn test_empty_and_blank_only() {
        assert_eq!(clean_answer(""), "");
        assert_eq!(clean_answer("\n \n\t\n"), "");
    }

    #[test]
    fn test_line_content_is_preserved() {
        // indentation and trailing spaces on kept lines are not touched
        assert_eq!(clean_answer("  - ibuprofen \n\n  - rest"), "  - ibuprofen \n  - rest");
        assert_eq!(clean_answer("one\r\n\r\ntwo"), "one\r\ntwo");
    }
}
