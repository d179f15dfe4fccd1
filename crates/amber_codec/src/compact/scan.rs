//! Scanners over the compact record grammar.
//!
//! A compact stream is a run of brace-delimited records, each holding
//! quoted `"name" : "value"` pairs. The scanners here are restartable and
//! borrow from the input; [`records`] walks the records of a stream and
//! [`properties`] walks the pairs of one record body. Decoding builds on
//! them, but they are public so callers can pull records out of mixed
//! text without binding anything.
//!
//! Quotes protect their content: braces inside a quoted run never open or
//! close a record. Once a record has been read, a bare quote before the
//! next opening brace ends the stream; that is how a nested record run
//! embedded in a larger record knows where to stop.

use std::borrow::Cow;

use super::CompactError;

// -----------------------------------------------------------------------------
// Records

/// One record found in a compact stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    body: &'a str,
    end: usize,
}

impl<'a> Record<'a> {
    /// The record's interior between its braces, trimmed.
    #[inline]
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Byte offset of the record's closing brace in the scanned text.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }
}

/// Returns an iterator over the records of `text`, scanning from the
/// start.
pub fn records(text: &str) -> Records<'_> {
    Records::from_offset(text, 0)
}

/// Finds the next record at or after byte offset `from`.
///
/// Returns `Ok(None)` when the remaining text holds no record.
pub fn next_record(text: &str, from: usize) -> Result<Option<Record<'_>>, CompactError> {
    Records::from_offset(text, from).next().transpose()
}

/// Iterator over the records of a compact stream.
pub struct Records<'a> {
    text: &'a str,
    pos: usize,
    after_record: bool,
    done: bool,
}

impl<'a> Records<'a> {
    /// Starts a scan at byte offset `from`.
    pub fn from_offset(text: &'a str, from: usize) -> Self {
        Self {
            text,
            pos: from,
            after_record: false,
            done: false,
        }
    }

    fn fail(&mut self, offset: usize, reason: &'static str) -> CompactError {
        self.done = true;
        CompactError::MalformedRecord { offset, reason }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, CompactError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let bytes = self.text.as_bytes();
        let mut start = 0;
        let mut depth = 0usize;
        let mut i = self.pos;
        // Only ASCII is structural, so scanning bytes is UTF-8 safe.
        while i < bytes.len() {
            match bytes[i] {
                b'"' if depth > 0 => match find_byte(bytes, i + 1, b'"') {
                    Some(close) => i = close,
                    None => return Some(Err(self.fail(i, "unterminated quote"))),
                },
                b'"' if self.after_record => {
                    self.done = true;
                    return None;
                }
                b'{' => {
                    if depth == 0 {
                        start = i;
                    }
                    depth += 1;
                }
                b'}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = i + 1;
                        self.after_record = true;
                        return Some(Ok(Record {
                            body: self.text[start + 1..i].trim(),
                            end: i,
                        }));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        if depth > 0 {
            return Some(Err(self.fail(start, "unbalanced braces")));
        }
        self.done = true;
        None
    }
}

// -----------------------------------------------------------------------------
// Properties

/// Returns an iterator over the `(name, value)` pairs of one record body,
/// as handed out by the record scanners.
pub fn properties(body: &str) -> Properties<'_> {
    Properties {
        body,
        pos: 0,
        done: false,
    }
}

/// Iterator over the property pairs of a record body.
///
/// Scalar values are borrowed straight from the body. A nested value, one
/// or more records standing in for the value text, is re-joined into an
/// owned string of `{ ... }` groups separated by `", "`, ready to be
/// scanned again with [`records`].
///
/// Pairs with an empty name or an empty scalar value are dropped rather
/// than yielded; the formats builds on this to leave valueless entries
/// out entirely.
pub struct Properties<'a> {
    body: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Properties<'a> {
    fn fail(&mut self, offset: usize, reason: &'static str) -> CompactError {
        self.done = true;
        CompactError::MalformedRecord { offset, reason }
    }

    /// Joins the records of an embedded run starting at `from`, advancing
    /// `pos` past the last one.
    fn join_nested(&mut self, from: usize) -> Result<String, CompactError> {
        let mut parts = Vec::new();
        let mut last = from;
        for record in Records::from_offset(self.body, from) {
            let record = record.inspect_err(|_| self.done = true)?;
            parts.push(format!("{{ {} }}", record.body()));
            last = record.end();
        }
        self.pos = last + 1;
        Ok(parts.join(", "))
    }
}

impl<'a> Iterator for Properties<'a> {
    type Item = Result<(&'a str, Cow<'a, str>), CompactError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.body.as_bytes();
        loop {
            if self.done {
                return None;
            }
            // A property is a quoted name followed by its value form.
            let Some(open) = find_byte(bytes, self.pos, b'"') else {
                self.done = true;
                return None;
            };
            let Some(close) = find_byte(bytes, open + 1, b'"') else {
                return Some(Err(self.fail(open, "unterminated property name")));
            };
            let name = &self.body[open + 1..close];

            let Some(marker) = find_value_start(bytes, close + 1) else {
                return Some(Err(self.fail(open, "property without a value")));
            };
            match bytes[marker] {
                b'"' if bytes.get(marker + 1) == Some(&b'{') => {
                    // Records embedded in a quoted value.
                    let value = match self.join_nested(marker + 1) {
                        Ok(value) => value,
                        Err(error) => return Some(Err(error)),
                    };
                    if bytes.get(self.pos) == Some(&b'"') {
                        self.pos += 1;
                    }
                    if !name.is_empty() {
                        return Some(Ok((name, Cow::Owned(value))));
                    }
                }
                b'"' => {
                    let Some(end) = find_byte(bytes, marker + 1, b'"') else {
                        return Some(Err(self.fail(marker, "unterminated property value")));
                    };
                    let value = &self.body[marker + 1..end];
                    self.pos = end + 1;
                    if !name.is_empty() && !value.is_empty() {
                        return Some(Ok((name, Cow::Borrowed(value))));
                    }
                }
                b'{' => {
                    let value = match self.join_nested(marker) {
                        Ok(value) => value,
                        Err(error) => return Some(Err(error)),
                    };
                    if !name.is_empty() {
                        return Some(Ok((name, Cow::Owned(value))));
                    }
                }
                _ => {
                    // A bracketed sequence, kept verbatim with its brackets.
                    let Some(end) = find_sequence_end(bytes, marker + 1) else {
                        return Some(Err(self.fail(marker, "unterminated sequence")));
                    };
                    let value = &self.body[marker..=end];
                    self.pos = end + 1;
                    if !name.is_empty() {
                        return Some(Ok((name, Cow::Borrowed(value))));
                    }
                }
            }
        }
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|at| from + at)
}

/// Finds the first byte after a property name that can start a value:
/// a quote, an opening brace or an opening bracket.
fn find_value_start(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| matches!(b, b'"' | b'{' | b'['))
        .map(|at| from + at)
}

/// Finds the closing bracket of a sequence, honoring quoted runs.
fn find_sequence_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b']' => return Some(i),
            b'"' => i = find_byte(bytes, i + 1, b'"')?,
            _ => {}
        }
        i += 1;
    }
    None
}

// -----------------------------------------------------------------------------
// Tests
