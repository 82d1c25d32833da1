use std::collections::HashMap;

use crate::http::error::ParseError;

pub(crate) const CRLF: &[u8] = b"\r\n";

/// Field names are stored lowercased and trimmed, values trimmed.
///
/// Setting a name that is already present joins the values with `", "` in
/// arrival order, the way repeated fields are folded on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one field line from the front of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line ending
    /// the header block was reached. `(0, false)` means no complete line is
    /// buffered yet.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok((0, false));
        };
        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &data[..idx];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| ParseError::invalid_header_syntax(String::from_utf8_lossy(line)))?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        if name.last().is_some_and(u8::is_ascii_whitespace) {
            return Err(ParseError::invalid_header_syntax(String::from_utf8_lossy(line)));
        }

        let name = name.trim_ascii_start();
        if name.is_empty() || !name.iter().all(|&b| is_token_byte(b)) {
            return Err(ParseError::InvalidHeaderName(
                String::from_utf8_lossy(name).into_owned(),
            ));
        }

        // token bytes are ASCII, so the name is valid UTF-8
        let name = String::from_utf8_lossy(name);
        let value = String::from_utf8_lossy(value);
        self.set(&name, &value);
        Ok((idx + CRLF.len(), false))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&normalize(name))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&normalize(name))
    }

    /// Inserts a field, merging with an existing value of the same name.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.trim();
        self.fields
            .entry(normalize(name))
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Inserts a field, discarding any previous value.
    pub fn replace(&mut self, name: &str, value: &str) {
        self.fields.insert(normalize(name), value.trim().to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len())
        .position(|w| w == CRLF)
}

/// `tchar` from RFC 9110: letters, digits and ``!#$%&'*+-.^_`|~``.
pub fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
