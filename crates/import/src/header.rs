use crate::locale::LocalePack;
use crate::util::{non_blank_lines, split_line};

/// Where the header sits and what follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRow {
    /// Raw line index of the header (blank lines count).
    pub skip_lines: usize,
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
}

struct Candidate {
    line_index: usize,
    cells: Vec<String>,
    has_keyword: bool,
}

/// Finds the header row among the first `scan_limit` non-blank lines.
///
/// Lines mentioning a header keyword are preferred, and among them the one
/// with the most columns wins: banners tend to carry a stray "Date" but few
/// cells. Without any keyword line the widest line is taken. Ties keep the
/// earliest line.
pub fn locate_header(
    text: &str,
    delimiter: char,
    pack: &LocalePack,
    scan_limit: usize,
    sample_limit: usize,
) -> HeaderRow {
    let candidates: Vec<Candidate> = non_blank_lines(text)
        .take(scan_limit)
        .map(|(line_index, line)| Candidate {
            line_index,
            cells: split_line(line, delimiter),
            has_keyword: pack.is_header_candidate(line),
        })
        .collect();

    let chosen = widest(candidates.iter().filter(|c| c.has_keyword))
        .or_else(|| widest(candidates.iter()));

    let Some(chosen) = chosen else {
        return HeaderRow::default();
    };

    tracing::debug!(
        "header row at line {} with {} columns (keyword match: {})",
        chosen.line_index,
        chosen.cells.len(),
        chosen.has_keyword
    );

    let sample_rows = non_blank_lines(text)
        .filter(|(i, _)| *i > chosen.line_index)
        .take(sample_limit)
        .map(|(_, line)| split_line(line, delimiter))
        .collect();

    HeaderRow {
        skip_lines: chosen.line_index,
        headers: chosen.cells.clone(),
        sample_rows,
    }
}

fn widest<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Option<&'a Candidate> {
    candidates.fold(None::<&'a Candidate>, |best, c| match best {
        Some(b) if b.cells.len() >= c.cells.len() => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(text: &str, delimiter: char) -> HeaderRow {
        locate_header(text, delimiter, &LocalePack::seed(), 20, 5)
    }

    #[test]
    fn wide_keyword_line_beats_banner() {
        let text = "Extrato Date;01/02/2024\n\
                    Data Mov;Descrição;Débito;Crédito\n\
                    15/01/2024;Padaria;12,50;\n";
        let row = locate(text, ';');
        assert_eq!(row.skip_lines, 1);
        assert_eq!(row.headers, vec!["Data Mov", "Descrição", "Débito", "Crédito"]);
        assert_eq!(row.sample_rows, vec![vec!["15/01/2024", "Padaria", "12,50", ""]]);
    }

    #[test]
    fn falls_back_to_widest_line_without_keywords() {
        let text = "foo;bar\nalpha;beta;gamma\nx;y;z\n";
        let row = locate(text, ';');
        assert_eq!(row.skip_lines, 1);
        assert_eq!(row.headers, vec!["alpha", "beta", "gamma"]);
        assert_eq!(row.sample_rows.len(), 1);
    }

    #[test]
    fn ties_keep_the_earliest_line() {
        let text = "Date,Description,Amount\n01/02/2024,Amount due,5.00\n";
        let row = locate(text, ',');
        assert_eq!(row.skip_lines, 0);
    }

    #[test]
    fn skip_lines_counts_blank_lines() {
        let text = "Bank statement\n\nDate,Description,Amount\n01/02/2024,Coffee,3.50\n";
        let row = locate(text, ',');
        assert_eq!(row.skip_lines, 2);
        assert_eq!(row.headers[0], "Date");
    }

    #[test]
    fn header_beyond_scan_window_is_not_found() {
        let mut text = String::new();
        for i in 0..25 {
            text.push_str(&format!("row {i}\n"));
        }
        text.push_str("Date,Description,Amount\n");
        let row = locate(&text, ',');
        assert!(row.skip_lines < 20);
        assert_ne!(row.headers, vec!["Date", "Description", "Amount"]);
    }

    #[test]
    fn sample_window_is_bounded_and_skips_blanks() {
        let mut text = String::from("Date,Description,Amount\n");
        for i in 0..10 {
            text.push_str(&format!("01/0{}/2024,Item {i},1.00\n\n", i % 9 + 1));
        }
        let row = locate(&text, ',');
        assert_eq!(row.sample_rows.len(), 5);
        assert_eq!(row.sample_rows[4][1], "Item 4");
    }

    #[test]
    fn empty_text_has_no_headers() {
        assert_eq!(locate("", ','), HeaderRow::default());
        assert_eq!(locate("\n \n", ','), HeaderRow::default());
    }
}
