use crate::util::non_blank_lines;

/// Separators considered, in tie-breaking order.
pub const CANDIDATES: [char; 4] = [';', '\t', ',', '|'];

/// Used when no candidate appears at all.
pub const DEFAULT_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterGuess {
    pub delimiter: char,
    /// Occurrences of `delimiter` in the sampled line.
    pub count: usize,
}

/// Picks the candidate occurring most often in `line`. Ties go to the
/// earlier candidate; a line without any candidate yields a comma.
pub fn detect_delimiter(line: &str) -> DelimiterGuess {
    CANDIDATES.iter().fold(
        DelimiterGuess {
            delimiter: DEFAULT_DELIMITER,
            count: 0,
        },
        |best, &candidate| {
            let count = line.matches(candidate).count();
            if count > best.count {
                DelimiterGuess {
                    delimiter: candidate,
                    count,
                }
            } else {
                best
            }
        },
    )
}

/// Runs [`detect_delimiter`] on the first non-blank line of `text`.
pub fn detect_in_text(text: &str) -> DelimiterGuess {
    let first = non_blank_lines(text).next().map_or("", |(_, line)| line);
    detect_delimiter(first)
}
