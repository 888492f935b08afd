//! CSV row materialization.
//!
//! Each CSV row becomes one pseudo-document: its fields concatenated with a
//! single space between them. Double-quoted fields follow RFC 4180 with `""`
//! as an escaped quote. The delimiter is a single configurable byte, which
//! may itself be `\n` (in which case every field ends up in one row per
//! line-less stream).

/// Split a CSV byte stream into pseudo-document rows.
///
/// Rows are terminated by `\n`, `\r\n`, or a bare `\r` outside quotes. Rows
/// that materialize to nothing are not emitted. An unterminated quote at end
/// of input flushes the partial field as the last row's final field.
pub fn read_rows(bytes: &[u8], delimiter: u8) -> Vec<Vec<u8>> {
    let mut rows = Vec::new();
    let mut row: Vec<u8> = Vec::new();
    let mut field: Vec<u8> = Vec::new();
    let mut in_quotes = false;

    let mut iter = bytes.iter().copied().peekable();
    while let Some(b) = iter.next() {
        if in_quotes {
            if b == b'"' {
                if iter.peek() == Some(&b'"') {
                    field.push(b'"');
                    iter.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(b);
            }
        } else if b == b'"' {
            in_quotes = true;
        } else if b == delimiter {
            flush_field(&mut row, &mut field);
        } else if b == b'\n' || b == b'\r' {
            if !row.is_empty() || !field.is_empty() {
                flush_field(&mut row, &mut field);
                rows.push(std::mem::take(&mut row));
            }
            if b == b'\r' && iter.peek() == Some(&b'\n') {
                iter.next();
            }
        } else {
            field.push(b);
        }
    }
    if !row.is_empty() || !field.is_empty() {
        flush_field(&mut row, &mut field);
        rows.push(row);
    }
    rows
}

fn flush_field(row: &mut Vec<u8>, field: &mut Vec<u8>) {
    if !row.is_empty() {
        row.push(b' ');
    }
    row.append(field);
}
