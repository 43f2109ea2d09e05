/// Declares a function returning a lazily compiled, process-wide regex.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub(crate) use re;

/// Non-blank lines of `text` paired with their raw line index.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Splits a single line on `delimiter`, honouring double-quoted cells.
/// Cells are trimmed. Lines the reader cannot make sense of are split plainly.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    if !delimiter.is_ascii() {
        return plain_split(line, delimiter);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();

    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(|cell| cell.trim().to_string()).collect(),
        _ => plain_split(line, delimiter),
    }
}

fn plain_split(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_but_indices_kept() {
        let text = "a\n\n   \nb\n";
        let lines: Vec<_> = non_blank_lines(text).collect();
        assert_eq!(lines, vec![(0, "a"), (3, "b")]);
    }

    #[test]
    fn crlf_endings_are_stripped() {
        let lines: Vec<_> = non_blank_lines("a;b\r\nc;d\r\n").collect();
        assert_eq!(lines, vec![(0, "a;b"), (1, "c;d")]);
    }

    #[test]
    fn split_trims_cells() {
        assert_eq!(split_line(" a ; b ;c", ';'), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_keeps_quoted_delimiters_together() {
        assert_eq!(
            split_line(r#"01/15/2024,"Coffee, large","1,234.56""#, ','),
            vec!["01/15/2024", "Coffee, large", "1,234.56"]
        );
    }

    #[test]
    fn split_tab_delimited() {
        assert_eq!(split_line("a\tb\t\tc", '\t'), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn trailing_delimiter_yields_empty_cell() {
        assert_eq!(split_line("a;b;", ';'), vec!["a", "b", ""]);
    }
}
