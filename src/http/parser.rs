use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use std::collections::HashMap;

/// Largest request head accepted before the blank line.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;
/// Largest body a request may declare through Content-Length.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    HeadTooLarge,
    BodyTooLarge,
    Incomplete,
}

impl ParseError {
    /// Status to answer a request that failed to parse with.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::BodyTooLarge => StatusCode::PayloadTooLarge,
            _ => StatusCode::BadRequest,
        }
    }
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// `ParseError::Incomplete` when more input is needed.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(end) if end > MAX_HEAD_BYTES => return Err(ParseError::HeadTooLarge),
        Some(end) => end,
        None if buf.len() > MAX_HEAD_BYTES => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequest)?;
    let mut lines = headers_str.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;
    if parts.next().is_some() || !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method: Method = method_str.parse().map_err(|_| ParseError::InvalidMethod)?;

    let mut headers = HashMap::new();
    let mut content_length = 0usize;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }

        if key.eq_ignore_ascii_case("Content-Length") {
            content_length = value
                .parse()
                .map_err(|_| ParseError::InvalidContentLength)?;
        }

        headers.insert(key.to_string(), value.to_string());
    }

    // Checked before waiting for the body so it is never buffered.
    if content_length > MAX_BODY_BYTES {
        return Err(ParseError::BodyTooLarge);
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method,
        path: target.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    Ok((request, headers_end + 4 + content_length))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
