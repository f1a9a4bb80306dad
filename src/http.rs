pub mod server;
pub use server::*;

pub mod request;
pub use request::*;

pub mod response;
pub use response::*;

pub mod client;
pub use client::*;

use crate::errors::{Error, Result};
use std::io::Read;

/// Largest body accepted from a chunked message
pub(crate) const MAX_BODY_LEN: usize = 16 * 1024 * 1024;

/// Case-insensitive header lookup shared by requests and responses
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Value of the `Content-Length` header, if there is one
pub(crate) fn content_length(headers: &[(String, String)]) -> Result<Option<usize>> {
    header_value(headers, "Content-Length")
        .map(|length| {
            length
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::MalformedHttp(format!("bad Content-Length '{}'", length)))
        })
        .transpose()
}

/// Read from `reader` until `parse` recognizes a complete head.
///
/// `parse` returns `Ok(None)` while the head is partial. On success, yields the
/// bytes read so far, the length of the head within them and the parsed head.
pub(crate) fn read_head<R, T, F>(reader: &mut R, mut parse: F) -> Result<(Vec<u8>, usize, T)>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<Option<(usize, T)>>,
{
    let mut buf = Vec::new();
    let mut chunk = [0; 4096];
    loop {
        let bytes_read = reader.read(&mut chunk)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        buf.extend_from_slice(&chunk[..bytes_read]);

        if let Some((parsed_len, head)) = parse(&buf)? {
            return Ok((buf, parsed_len, head));
        }
    }
}

/// Reads a message body that may already be partially buffered after the head.
pub(crate) struct BodyReader<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
}

impl<R: Read> BodyReader<R> {
    pub(crate) fn new(reader: R, buf: Vec<u8>, pos: usize) -> Self {
        BodyReader { reader, buf, pos }
    }

    /// Pull more bytes in. `false` on end of stream.
    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0; 4096];
        let bytes_read = self.reader.read(&mut chunk)?;
        self.buf.extend_from_slice(&chunk[..bytes_read]);
        Ok(bytes_read > 0)
    }

    fn ensure(&mut self, len: usize) -> Result<()> {
        while self.buf.len() - self.pos < len {
            if !self.fill()? {
                return Err(Error::ConnectionReset);
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        loop {
            if let Some(end) = self.buf[self.pos..].windows(2).position(|w| w == b"\r\n") {
                let line = self.buf[self.pos..self.pos + end].to_vec();
                self.pos += end + 2;
                return Ok(line);
            }
            if !self.fill()? {
                return Err(Error::ConnectionReset);
            }
        }
    }

    pub(crate) fn read_exact_len(mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure(len)?;
        Ok(self.buf[self.pos..self.pos + len].to_vec())
    }

    /// For `Connection: close` answers without any length information
    pub(crate) fn read_to_end(mut self) -> Result<Vec<u8>> {
        while self.fill()? {}
        Ok(self.buf[self.pos..].to_vec())
    }

    /// Decode a `Transfer-Encoding: chunked` body. Trailers are ignored.
    pub(crate) fn read_chunked(mut self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        loop {
            let line = self.read_line()?;
            let line = String::from_utf8_lossy(&line);
            let size_hex = line.split(';').next().unwrap_or_default().trim();
            let size = usize::from_str_radix(size_hex, 16)
                .map_err(|_| Error::MalformedHttp(format!("bad chunk size '{}'", size_hex)))?;
            if size == 0 {
                return Ok(body);
            }
            if size > MAX_BODY_LEN || body.len() + size > MAX_BODY_LEN {
                return Err(Error::MalformedHttp(format!(
                    "chunked body larger than {} bytes",
                    MAX_BODY_LEN
                )));
            }
            self.ensure(size + 2)?;
            body.extend_from_slice(&self.buf[self.pos..self.pos + size]);
            self.pos += size + 2;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_simple_http_request() {
        let server = HttpServer::new("127.0.0.1:0").expect("Failed to bind");
        let addr = server.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            server.serve_once(|req| {
                assert_eq!(req.body, "{\"content\": \"Hello\"}");
                Response::ok()
            })
        });

        let client = HttpClient::for_address(&addr.to_string()).unwrap();
        let resp = client
            .send(&Request::post("/", "{\"content\": \"Hello\"}".to_string()))
            .expect("Failed to communicate with server");

        assert_eq!(resp.status, Some(204));

        handle.join().unwrap();
    }

    #[test]
    fn test_header_lookup() {
        let headers = vec![
            ("content-length".to_string(), " 12 ".to_string()),
            ("X-Test".to_string(), "yes".to_string()),
        ];
        assert_eq!(header_value(&headers, "x-test"), Some("yes"));
        assert_eq!(header_value(&headers, "missing"), None);
        assert_eq!(content_length(&headers).unwrap(), Some(12));

        let headers = vec![("Content-Length".to_string(), "twelve".to_string())];
        assert!(content_length(&headers).is_err());
        assert_eq!(content_length(&[]).unwrap(), None);
    }
}
