use crate::config::ApiUrl;
use crate::errors::Result;
use crate::http::{parse_response, Request, Response};
use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Anything able to carry a request to the API and bring an answer back.
///
/// `HttpClient` is the real thing. Tests swap in `mock::ScriptedTransport` to
/// look at the requests without opening sockets.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response>;
}

/// Simple HTTP client
///
/// It sends HTTP requests from a set of parameters, then parses and yields the server response.
/// A fresh connection is opened for every request and closed by the server afterwards.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api: ApiUrl,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(api: ApiUrl, timeout: Duration) -> Self {
        HttpClient { api, timeout }
    }

    /// Client for a bare `host:port`, with no path prefix
    pub fn for_address(address: &str) -> Result<Self> {
        Ok(Self::new(
            ApiUrl::parse(&format!("http://{}", address))?,
            Duration::from_secs(10),
        ))
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }
}

impl Transport for HttpClient {
    /// Send an HTTP request on a new connection.
    ///
    /// The request path is relative to the API prefix. `Host` and
    /// `Connection: close` are added here.
    fn send(&self, request: &Request) -> Result<Response> {
        let mut stream = TcpStream::connect(self.api.authority())?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let mut wire = request.clone();
        wire.path = self.api.target(&request.path);
        let wire = wire
            .with_header("Host", &self.api.host_header())
            .with_header("Connection", "close");

        tracing::debug!(method = %wire.method, path = %wire.path, "sending request");
        stream.write_all(&wire.to_bytes())?;
        stream.flush()?;

        let response = parse_response(BufReader::new(&mut stream))?;
        tracing::debug!(status = ?response.status, path = %wire.path, "received response");
        Ok(response)
    }
}

pub mod mock {
    use super::*;
    use std::sync::Mutex;

    type Script = Box<dyn Fn(&Request) -> Result<Response> + Send + Sync>;

    /// In-memory transport answering with a closure and remembering what it was sent
    pub struct ScriptedTransport {
        script: Script,
        sent: Mutex<Vec<Request>>,
    }

    impl ScriptedTransport {
        pub fn new<F>(script: F) -> Self
        where
            F: Fn(&Request) -> Result<Response> + Send + Sync + 'static,
        {
            ScriptedTransport {
                script: Box::new(script),
                sent: Mutex::new(Vec::new()),
            }
        }

        /// Transport whose every request fails as if the server was down
        pub fn offline() -> Self {
            Self::new(|_| Err(crate::errors::Error::NoResponse))
        }

        pub fn sent(&self) -> Vec<Request> {
            self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &Request) -> Result<Response> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(request.clone());
            }
            (self.script)(request)
        }
    }
}
