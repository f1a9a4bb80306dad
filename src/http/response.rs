use std::io::{BufReader, Read};

use crate::errors::{Error, Result};
use crate::http::{content_length, header_value, read_head, BodyReader};

/// An HTTP response, either read back by the client or sent by the stub server
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code of the response. Optional because that's what httparse returns, but it
    /// shouldn't happen in practice.
    pub status: Option<u16>,
    /// Headers for the response. It is not necessary to add Content-Length to it, this is done
    /// automatically on serialization.
    pub headers: Vec<(String, String)>,
    /// Body of the response. Give an empty string for an empty body
    pub body: String,
}

impl Response {
    /// Creates an empty OK response (204)
    pub fn ok() -> Response {
        Response {
            status: Some(204),
            headers: vec![],
            body: "".to_string(),
        }
    }

    /// Creates an OK (200) response with the given body
    pub fn ok_with_body(str: String) -> Response {
        Response {
            status: Some(200),
            headers: vec![],
            body: str,
        }
    }

    /// Creates a JSON response with the given status
    pub fn json(status: u16, body: &serde_json::Value) -> Response {
        Response {
            status: Some(status),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    /// Creates an error response carrying `{"detail": message}`, the way the API does.
    ///
    /// The code must be in the 4xx or 5xx range.
    pub fn error(code: u16, message: &str) -> Response {
        assert!((400..600).contains(&code), "Invalid error code");
        Self::json(code, &serde_json::json!({ "detail": message }))
    }

    /// Creates an Internal Server Error (500) response.
    pub fn internal_server_error() -> Response {
        Self::error(500, "Internal Server Error")
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// Parse an HTTP response from a byte stream
///
/// The body is delimited by `Content-Length`, by chunked transfer encoding, or
/// by the end of the stream when the server sent neither.
pub fn parse_response<T>(mut buf_reader: BufReader<T>) -> Result<Response>
where
    T: Sized + Read,
{
    let (buf, parsed_len, mut response) = read_head(&mut buf_reader, |bytes| {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut resp = httparse::Response::new(&mut headers);
        match resp.parse(bytes)? {
            httparse::Status::Complete(parsed_len) => Ok(Some((
                parsed_len,
                Response {
                    status: resp.code,
                    headers: resp
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

    let body_reader = BodyReader::new(buf_reader, buf, parsed_len);
    let chunked = response
        .header("Transfer-Encoding")
        .is_some_and(|te| te.to_ascii_lowercase().contains("chunked"));

    let body = if chunked {
        body_reader.read_chunked()?
    } else if let Some(len) = content_length(&response.headers)? {
        body_reader.read_exact_len(len)?
    } else if matches!(response.status, Some(204) | Some(304)) {
        Vec::new()
    } else {
        body_reader.read_to_end()?
    };

    response.body = String::from_utf8(body)
        .map_err(|_| Error::MalformedHttp("response body is not UTF-8".to_string()))?;

    Ok(response)
}
