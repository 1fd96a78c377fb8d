/// A small reader for comma-separated tables: one header row followed by data rows. Fields may
/// be double-quoted to carry embedded commas, and a doubled quote inside a quoted field is a
/// literal quote. Fields never span lines. That is everything our datasets use; anything
/// fancier in the input is a data problem we want surfaced, not papered over.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    #[error("missing header row")]
    MissingHeader,
    #[error("line {line}: {message}")]
    MalformedRow { line: usize, message: String },
}

/// An undecoded table: header names plus string cells. Every row has exactly as many cells as
/// there are headers; `parse` enforces that, so positional access through `column_index` is
/// always in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse CSV text into a `RawTable`. The first non-empty line is the header row; header names
/// are trimmed, cells are kept verbatim. Blank lines are skipped. CRLF input is fine.
pub fn parse(content: &str) -> Result<RawTable, CsvError> {
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let fields = split_line(line, lineno)?;
        match &headers {
            None => headers = Some(fields.iter().map(|h| h.trim().to_string()).collect()),
            Some(hs) => {
                if fields.len() != hs.len() {
                    return Err(CsvError::MalformedRow {
                        line: lineno,
                        message: format!("expected {} fields, found {}", hs.len(), fields.len()),
                    });
                }
                rows.push(fields);
            }
        }
    }
    match headers {
        Some(headers) => Ok(RawTable { headers, rows }),
        None => Err(CsvError::MissingHeader),
    }
}

fn split_line(line: &str, lineno: usize) -> Result<Vec<String>, CsvError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                    // A closing quote must end the field.
                    match chars.peek() {
                        None | Some(',') => {}
                        Some(other) => {
                            return Err(CsvError::MalformedRow {
                                line: lineno,
                                message: format!("unexpected character {other:?} after closing quote"),
                            });
                        }
                    }
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(CsvError::MalformedRow {
            line: lineno,
            message: "unterminated quoted field".to_string(),
        });
    }
    fields.push(field);
    Ok(fields)
}
