/// Strip the indentation of the first line from every line.
///
/// The prefix length comes from the first line only. Lines that do not start
/// with that exact run of spaces are left as they are.
pub fn trim_leading_spaces(lines: &mut [String]) {
    let Some(first) = lines.first() else {
        return;
    };

    let prefix = " ".repeat(count_leading_spaces(first));
    for line in lines.iter_mut() {
        if let Some(rest) = line.strip_prefix(prefix.as_str()) {
            *line = rest.to_string();
        }
    }
}

fn count_leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmed(input: &[&str]) -> Vec<String> {
        let mut lines: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        trim_leading_spaces(&mut lines);
        lines
    }

    #[test]
    fn common_indent() {
        assert_eq!(trimmed(&["    foo", "    bar"]), vec!["foo", "bar"]);
    }

    #[test]
    fn shorter_indent_left_unchanged() {
        assert_eq!(
            trimmed(&["    foo", "    bar", "  baz"]),
            vec!["foo", "bar", "  baz"]
        );
    }

    #[test]
    fn deeper_indent_keeps_remainder() {
        assert_eq!(trimmed(&[" a", "   b"]), vec!["a", "  b"]);
    }

    #[test]
    fn first_line_unindented() {
        assert_eq!(trimmed(&["a", "  b"]), vec!["a", "  b"]);
    }

    #[test]
    fn empty_slice() {
        assert!(trimmed(&[]).is_empty());
    }
}
