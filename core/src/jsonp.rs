//! JSONP wrapper stripping
//!
//! Detects a simple `identifier( ... );` callback around the document and
//! returns the inner text together with how many lines and columns were
//! skipped, so parse errors can still point at the right place in the file.
//! Anything that does not look like a balanced wrapper is returned untouched.

/// Input text after JSONP detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stripped<'a> {
    pub body: &'a str,
    pub rows_skipped: usize,
    pub cols_skipped: usize,
    pub detected: bool,
}

impl<'a> Stripped<'a> {
    fn untouched(input: &'a str) -> Self {
        Stripped {
            body: input,
            rows_skipped: 0,
            cols_skipped: 0,
            detected: false,
        }
    }
}

fn is_json_white(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_identifier(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'$' | b'_' | b'.')
}

/// Strip a JSONP callback wrapper if one is present
pub fn strip(input: &str) -> Stripped<'_> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Stripped::untouched(input);
    }

    // `first` is inclusive, `last` is inclusive
    let mut first = 0;
    let mut last = bytes.len() - 1;

    // Trailing whitespace and semicolons
    while first < last && (is_json_white(bytes[last]) || bytes[last] == b';') {
        last -= 1;
    }

    // Closing brackets, still skipping whitespace
    let mut brackets: i64 = 0;
    while first < last && (is_json_white(bytes[last]) || bytes[last] == b')') {
        if bytes[last] == b')' {
            brackets += 1;
        }
        last -= 1;
    }
    if brackets == 0 {
        return Stripped::untouched(input);
    }

    while first < last && is_json_white(bytes[first]) {
        first += 1;
    }
    while first < last && is_identifier(bytes[first]) {
        first += 1;
    }
    while first < last && (is_json_white(bytes[first]) || bytes[first] == b'(') {
        if bytes[first] == b'(' {
            brackets -= 1;
        }
        first += 1;
    }

    if brackets != 0 || first >= last {
        return Stripped::untouched(input);
    }

    let mut rows_skipped = 0;
    let mut cols_skipped = 0;
    for &b in &bytes[..first] {
        cols_skipped += 1;
        if b == b'\n' {
            cols_skipped = 0;
            rows_skipped += 1;
        }
    }

    // `first` stops on an ASCII byte and every byte after `last` is ASCII,
    // so both slice ends fall on char boundaries
    Stripped {
        body: &input[first..=last],
        rows_skipped,
        cols_skipped,
        detected: true,
    }
}
