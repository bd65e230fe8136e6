use std::collections::HashMap;
use std::str::FromStr;

/// HTTP request methods.
///
/// The router only ever serves content, so the method is carried through to
/// routing as a string and used by request handling for token checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    /// Parses a method name. Matching is case-sensitive.
    ///
    /// ```
    /// # use webhost::http::request::Method;
    /// assert_eq!("GET".parse::<Method>(), Ok(Method::GET));
    /// assert!("get".parse::<Method>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(()),
        }
    }
}

/// A parsed HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw request target, query string included (e.g. "/search?q=rust")
    pub path: String,
    pub version: String,
    /// Header names are stored as sent
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Looks up a header, ignoring ASCII case in the name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Content-Length as a number, 0 when missing or malformed.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Splits the target into its path and decoded parameters.
    ///
    /// Query-string pairs come first. For non-GET requests carrying a
    /// form-urlencoded body, body pairs are merged on top.
    pub fn route_target(&self) -> (String, HashMap<String, String>) {
        let (path, query) = match self.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.path.as_str(), None),
        };

        let mut params: HashMap<String, String> = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        if self.method != Method::GET && self.is_form_body() {
            params.extend(url::form_urlencoded::parse(&self.body).into_owned());
        }

        let path = if path.is_empty() { "/" } else { path };
        (path.to_string(), params)
    }

    fn is_form_body(&self) -> bool {
        self.header("Content-Type")
            .map(|v| {
                v.split(';')
                    .next()
                    .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
            })
            .unwrap_or(false)
    }
}
