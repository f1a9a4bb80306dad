use crate::errors::{Error, Result};
use crate::http::{content_length, header_value, read_head, BodyReader};
use std::io::{BufReader, Read};

/// Represents an HTTP request.
///
/// The client builds these and serializes them with `to_bytes`, the stub server
/// gets them out of `parse_request`.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method used in the request
    pub method: String,
    /// The full path of the request
    pub path: String,
    /// Headers of the request
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: String,
}

impl Request {
    /// Create a new request from scratch
    pub fn new(method: &str, path: &str, headers: Vec<(String, String)>, body: String) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            body,
        }
    }
    /// Create a new GET request for the given path, with an empty body
    pub fn get(path: &str) -> Request {
        Self::new("GET", path, vec![], String::new())
    }
    /// Create a new POST request for the given path, with the given body
    pub fn post(path: &str, body: String) -> Request {
        Self::new("POST", path, vec![], body)
    }
    /// Create a new PUT request for the given path, with the given body
    pub fn put(path: &str, body: String) -> Request {
        Self::new("PUT", path, vec![], body)
    }
    /// Create a new DELETE request for the given path, with an empty body
    pub fn delete(path: &str) -> Request {
        Self::new("DELETE", path, vec![], String::new())
    }

    /// Add a header, replacing any header with the same (case-insensitive) name
    pub fn with_header(mut self, name: &str, value: &str) -> Request {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// The token of an `Authorization: Bearer <token>` header
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Serialize the request for the wire. `Content-Length` is always computed here.
    pub fn to_bytes(&self) -> Vec<u8> {
        let headers = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("Content-Length"))
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect::<String>();
        format!(
            "{} {} HTTP/1.1\r\n{}Content-Length: {}\r\n\r\n{}",
            self.method,
            self.path,
            headers,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Parse an HTTP request from a byte stream
///
/// Only `Content-Length` delimited bodies are understood. This is what our own
/// client sends, and the stub server does not need more.
pub fn parse_request<T>(mut buf_reader: BufReader<T>) -> Result<Request>
where
    T: Sized + Read,
{
    let (buf, parsed_len, mut request) = read_head(&mut buf_reader, |bytes| {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        match req.parse(bytes)? {
            httparse::Status::Complete(parsed_len) => Ok(Some((
                parsed_len,
                Request {
                    method: req.method.unwrap_or("GET").to_string(),
                    path: req.path.unwrap_or("/").to_string(),
                    headers: req
                        .headers
                        .iter()
                        .map(|h| {
                            (
                                h.name.to_string(),
                                String::from_utf8_lossy(h.value).to_string(),
                            )
                        })
                        .collect(),
                    body: String::new(),
                },
            ))),
            httparse::Status::Partial => Ok(None),
        }
    })?;

    let body_len = content_length(&request.headers)?.unwrap_or(0);
    let body = BodyReader::new(buf_reader, buf, parsed_len).read_exact_len(body_len)?;
    request.body = String::from_utf8(body)
        .map_err(|_| Error::MalformedHttp("request body is not UTF-8".to_string()))?;

    Ok(request)
}
