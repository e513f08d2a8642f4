//! Minimal CSV reading and writing: comma delimiter, double-quote quoting with
//! doubled-quote escapes.

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Quote a field if it contains the delimiter, a quote, or a line break.
pub fn quote_field(value: &str) -> String {
    let needs_quoting = value.contains([DELIMITER, QUOTE, '\n', '\r']);
    if needs_quoting {
        format!("{QUOTE}{}{QUOTE}", value.replace(QUOTE, "\"\""))
    } else {
        value.to_string()
    }
}

/// Join fields into one CSV line, without the line terminator.
pub fn format_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse one CSV record into fields. Returns `None` for an unclosed quote or
/// stray text after a closing quote.
pub fn parse_record(record: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = record.chars().peekable();

    loop {
        if chars.peek() == Some(&QUOTE) {
            chars.next();
            let mut field = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == QUOTE {
                    if chars.peek() == Some(&QUOTE) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    field.push(c);
                }
            }
            if !closed {
                return None;
            }
            fields.push(field);
            match chars.next() {
                Some(DELIMITER) => {}
                None => break,
                _ => return None,
            }
        } else {
            let mut field = String::new();
            loop {
                match chars.next() {
                    Some(DELIMITER) => break,
                    Some(c) => field.push(c),
                    None => {
                        fields.push(field);
                        return Some(fields);
                    }
                }
            }
            fields.push(field);
        }
    }

    Some(fields)
}

/// Split text into records with their 1-based starting line. A quoted field
/// may span lines; an odd number of quotes keeps the record open.
pub fn split_records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;
    let mut open = false;

    for (idx, line) in text.lines().enumerate() {
        if !open {
            start_line = idx + 1;
            current.clear();
        } else {
            current.push('\n');
        }
        current.push_str(line.strip_suffix('\r').unwrap_or(line));
        if line.matches(QUOTE).count() % 2 == 1 {
            open = !open;
        }
        if !open && !current.trim().is_empty() {
            records.push((start_line, std::mem::take(&mut current)));
        }
    }
    if open && !current.is_empty() {
        records.push((start_line, current));
    }
    records
}
