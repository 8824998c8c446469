/// Find the anchor line of a section: the first heading whose text contains
/// `section_name`. Substring match, so `## Completed Tasks (Archived)` still
/// anchors a section named `Completed Tasks`.
fn find_section(lines: &[String], section_name: &str) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim().starts_with('#') && line.contains(section_name))
}

/// Insert `new_line` under the named section, keeping the section's entries
/// contiguous: the line goes immediately before the next heading of any
/// level, or at end of document when the section is last. A missing section
/// is created at the end of the document as a `## <section_name>` heading.
/// Exactly one line is added; nothing is removed or reordered.
pub fn insert_under_section(lines: &mut Vec<String>, section_name: &str, new_line: String) {
    match find_section(lines, section_name) {
        Some(anchor) => {
            let boundary = lines[anchor + 1..]
                .iter()
                .position(|line| line.trim().starts_with('#'))
                .map(|offset| anchor + 1 + offset)
                .unwrap_or(lines.len());
            lines.insert(boundary, new_line);
        }
        None => {
            lines.push(String::new());
            lines.push(format!("## {section_name}"));
            lines.push(new_line);
        }
    }
}

/// Insert `new_line` directly after the named section's heading line (the
/// placement duplicated tasks use), creating the section at the end of the
/// document when absent.
pub fn insert_after_heading(lines: &mut Vec<String>, section_name: &str, new_line: String) {
    match find_section(lines, section_name) {
        Some(anchor) => lines.insert(anchor + 1, new_line),
        None => {
            lines.push(String::new());
            lines.push(format!("## {section_name}"));
            lines.push(new_line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Vec<String> {
        text.split('\n').map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_insert_into_existing_section_before_next_heading() {
        let mut lines = doc("# Archive\n\n## Completed Tasks\n\n## Later\n");
        insert_under_section(&mut lines, "Completed Tasks", "- [x] Done".to_string());
        assert_eq!(
            lines,
            doc("# Archive\n\n## Completed Tasks\n\n- [x] Done\n## Later\n")
        );
    }

    #[test]
    fn test_insert_into_last_section_goes_to_end() {
        let mut lines = doc("# Archive\n\n## Completed Tasks\n\n");
        insert_under_section(&mut lines, "Completed Tasks", "- [x] Done".to_string());
        assert_eq!(lines, doc("# Archive\n\n## Completed Tasks\n\n- [x] Done"));
    }

    #[test]
    fn test_substring_heading_match() {
        let mut lines = doc("## Completed Tasks (Archived)\n");
        insert_under_section(&mut lines, "Completed Tasks", "- [x] Done".to_string());
        assert_eq!(lines, doc("## Completed Tasks (Archived)\n- [x] Done"));
    }

    #[test]
    fn test_missing_section_is_created_at_end() {
        let mut lines = doc("# Notes\n\nSome prose.");
        insert_under_section(&mut lines, "Completed Tasks", "- [x] Done".to_string());
        assert_eq!(
            lines,
            doc("# Notes\n\nSome prose.\n\n## Completed Tasks\n- [x] Done")
        );
    }

    #[test]
    fn test_empty_document_gets_fresh_section() {
        let mut lines = doc("");
        insert_under_section(&mut lines, "Completed Tasks", "- [x] Done".to_string());
        assert_eq!(lines, doc("\n\n## Completed Tasks\n- [x] Done"));
    }

    #[test]
    fn test_existing_lines_are_untouched() {
        let original = doc("# A\n\n## S\n- [x] old\n\n## B\ntext");
        let mut lines = original.clone();
        insert_under_section(&mut lines, "S", "- [x] new".to_string());
        assert_eq!(lines.len(), original.len() + 1);
        // Every original line survives in order.
        let mut it = lines.iter();
        for line in &original {
            assert!(it.any(|l| l == line), "lost line: {line}");
        }
    }

    #[test]
    fn test_boundary_is_any_heading_level() {
        let mut lines = doc("## S\n- [x] old\n### Sub\n");
        insert_under_section(&mut lines, "S", "- [x] new".to_string());
        assert_eq!(lines, doc("## S\n- [x] old\n- [x] new\n### Sub\n"));
    }

    #[test]
    fn test_insert_after_heading_directly_below_anchor() {
        let mut lines = doc("## S\n- [x] old\n");
        insert_after_heading(&mut lines, "S", "- [ ] copy".to_string());
        assert_eq!(lines, doc("## S\n- [ ] copy\n- [x] old\n"));
    }

    #[test]
    fn test_insert_after_heading_creates_missing_section() {
        let mut lines = doc("# Doc");
        insert_after_heading(&mut lines, "S", "- [ ] copy".to_string());
        assert_eq!(lines, doc("# Doc\n\n## S\n- [ ] copy"));
    }
}
