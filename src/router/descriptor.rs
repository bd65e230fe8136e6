use crate::http::response::StatusCode;
use bytes::Bytes;

/// Character encoding applied by a text loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
}

impl TextEncoding {
    pub fn charset(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// What a successful route produced: payload plus how to label it.
///
/// Built fresh for every request and owned by whoever asked for the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub data: Bytes,
    pub content_type: String,
    /// Set only by text content
    pub text_encoding: Option<TextEncoding>,
    pub status: StatusCode,
    /// When present the client is sent here instead of receiving `data`
    pub redirect_target: Option<String>,
}

impl ResponseDescriptor {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            text_encoding: None,
            status: StatusCode::Ok,
            redirect_target: None,
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = Some(encoding);
        self
    }

    pub fn redirect(target: impl Into<String>) -> Self {
        Self {
            data: Bytes::new(),
            content_type: String::new(),
            text_encoding: None,
            status: StatusCode::Found,
            redirect_target: Some(target.into()),
        }
    }

    /// Value for the Content-Type header, charset included for text.
    pub fn content_type_header(&self) -> String {
        match self.text_encoding {
            Some(enc) => format!("{}; charset={}", self.content_type, enc.charset()),
            None => self.content_type.clone(),
        }
    }
}
