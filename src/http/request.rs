use crate::http::error::ParseError;
use crate::http::headers::{CRLF, Headers, find_crlf};

/// The only protocol version accepted on the request-line.
pub const HTTP_VERSION: &str = "1.1";

/// The start line of a request: `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Uppercase method token; no fixed whitelist.
    pub method: String,
    /// Request target exactly as received.
    pub target: String,
    /// Version number without the `HTTP/` prefix, always `"1.1"`.
    pub version: String,
}

impl RequestLine {
    /// Parses the request-line from the front of `data`.
    ///
    /// Returns `Ok(None)` while no CRLF is buffered, otherwise the parsed line
    /// and the number of bytes consumed including the CRLF.
    pub fn parse(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok(None);
        };
        let request_line = Self::from_bytes(&data[..idx])?;
        Ok(Some((request_line, idx + CRLF.len())))
    }

    /// Parses a request-line without its CRLF. The target may hold any bytes;
    /// invalid UTF-8 in it is replaced, not rejected.
    pub fn from_bytes(line: &[u8]) -> Result<Self, ParseError> {
        let lossy = || String::from_utf8_lossy(line).into_owned();

        let parts: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
        let &[method, target, version] = parts.as_slice() else {
            return Err(ParseError::malformed_start_line(lossy()));
        };

        if method.is_empty() || !method.iter().all(u8::is_ascii_uppercase) {
            return Err(ParseError::InvalidMethod(
                String::from_utf8_lossy(method).into_owned(),
            ));
        }

        let slash = version
            .iter()
            .position(|&b| b == b'/')
            .ok_or_else(|| ParseError::malformed_start_line(lossy()))?;
        let (name, number) = (&version[..slash], &version[slash + 1..]);
        if name != b"HTTP" {
            return Err(ParseError::UnsupportedVersion(
                String::from_utf8_lossy(version).into_owned(),
            ));
        }
        if number != HTTP_VERSION.as_bytes() {
            return Err(ParseError::UnsupportedVersion(
                String::from_utf8_lossy(number).into_owned(),
            ));
        }

        Ok(RequestLine {
            method: String::from_utf8_lossy(method).into_owned(),
            target: String::from_utf8_lossy(target).into_owned(),
            version: HTTP_VERSION.to_string(),
        })
    }
}

impl std::str::FromStr for RequestLine {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(line.as_bytes())
    }
}

/// Progress of a [`Request`] through the wire format. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// An HTTP/1.1 request, filled in incrementally by [`Request::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    state: ParseState,
    head_len: usize,
}

impl Request {
    /// An empty request awaiting its request-line.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Bytes consumed so far by the request-line and header block.
    pub fn head_len(&self) -> usize {
        self.head_len
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Parses as much of `data` as possible and returns the bytes consumed.
    ///
    /// Stops when a step makes no progress or the request is complete. The
    /// caller must drop the consumed prefix before calling again. Calling it
    /// on a finished request is [`ParseError::AlreadyDone`].
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }

        let mut total = 0;
        while self.state != ParseState::Done {
            let n = self.parse_single(&data[total..])?;
            if n == 0 && self.state != ParseState::Done {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => {
                let Some((request_line, n)) = RequestLine::parse(data)? else {
                    return Ok(0);
                };
                self.request_line = request_line;
                self.state = ParseState::ParsingHeaders;
                self.head_len += n;
                Ok(n)
            }

            ParseState::ParsingHeaders => {
                let mut consumed = 0;
                loop {
                    let (n, done) = self.headers.parse(&data[consumed..])?;
                    consumed += n;
                    if done {
                        self.state = ParseState::ParsingBody;
                        break;
                    }
                    if n == 0 {
                        break;
                    }
                }
                self.head_len += consumed;
                Ok(consumed)
            }

            ParseState::ParsingBody => {
                let Some(declared) = self.headers.get("content-length") else {
                    self.state = ParseState::Done;
                    return Ok(0);
                };
                let declared = declared
                    .bytes()
                    .all(|b| b.is_ascii_digit())
                    .then(|| declared.parse::<usize>().ok())
                    .flatten()
                    .ok_or_else(|| ParseError::BadContentLength(declared.to_string()))?;

                self.body.extend_from_slice(data);
                if self.body.len() > declared {
                    return Err(ParseError::BodyLengthMismatch {
                        declared,
                        actual: self.body.len(),
                    });
                }
                if self.body.len() == declared {
                    self.state = ParseState::Done;
                }
                Ok(data.len())
            }

            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }
}

/// Builder for complete requests, handy when exercising handlers without a
/// socket.
#[derive(Default)]
pub struct RequestBuilder {
    request_line: RequestLine,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            request_line: RequestLine {
                method: "GET".to_string(),
                target: "/".to_string(),
                version: HTTP_VERSION.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.request_line.method = method.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.request_line.target = target.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the body and a matching `content-length`.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.headers
            .replace("content-length", &self.body.len().to_string());
        self
    }

    pub fn build(self) -> Request {
        Request {
            request_line: self.request_line,
            headers: self.headers,
            body: self.body,
            state: ParseState::Done,
            head_len: 0,
        }
    }
}
