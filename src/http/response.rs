use crate::http::headers::Headers;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Terminal zero-length chunk of a chunked body.
pub const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

/// HTTP status codes.
///
/// Codes with a fixed reason phrase have their own variant; every other code
/// goes through `Other` and is written without a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 500 Internal Server Error
    InternalServerError,
    Other(u16),
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpfromtcp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Other(404).as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalServerError => 500,
            StatusCode::Other(code) => *code,
        }
    }

    /// Returns the reason phrase, if this code has one.
    pub fn reason_phrase(&self) -> Option<&'static str> {
        match self {
            StatusCode::Ok => Some("OK"),
            StatusCode::BadRequest => Some("Bad Request"),
            StatusCode::InternalServerError => Some("Internal Server Error"),
            StatusCode::Other(_) => None,
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            500 => StatusCode::InternalServerError,
            other => StatusCode::Other(other),
        }
    }
}

/// `HTTP/1.1 <code> <reason>\r\n`, or `HTTP/1.1 <code>\r\n` without a known reason.
pub fn status_line(status: StatusCode) -> Vec<u8> {
    match status.reason_phrase() {
        Some(reason) => format!("{} {} {}\r\n", HTTP_VERSION, status.as_u16(), reason),
        None => format!("{} {}\r\n", HTTP_VERSION, status.as_u16()),
    }
    .into_bytes()
}

/// Field lines followed by the blank line ending the header block.
pub fn header_block(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, value) in headers.iter() {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf.extend_from_slice(b"\r\n");
    buf
}

/// One chunk: lowercase hex length, CRLF, payload, CRLF.
pub fn chunk(data: &[u8]) -> Vec<u8> {
    let mut buf = format!("{:x}\r\n", data.len()).into_bytes();
    buf.reserve(data.len() + 2);
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n");
    buf
}

/// Headers for a simple, non-streamed plain-text response.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", &content_length.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}
