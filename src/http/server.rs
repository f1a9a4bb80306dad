use crate::{errors, threadpool::ThreadPool};
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use crate::http::{parse_request, Request, Response};

/// Turn an HTTP status code into its reason phrase
pub fn code_to_string(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Minimal HTTP server, used to stand in for the real API.
///
/// It listens for incoming connections on a TCP socket, parses the requests and dispatches them
/// to a handler. Whatever the handler produces is sent back and the connection is closed.
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    /// Create a new server listening on the given address. Port 0 picks a free one.
    pub fn new(addr: &str) -> errors::Result<Self> {
        Ok(HttpServer {
            listener: TcpListener::bind(addr)?,
        })
    }

    /// The address actually bound
    pub fn local_addr(&self) -> errors::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the server
    ///
    /// Calls the handler with the incoming requests. Uses a threadpool internally to handle the
    /// requests concurrently on as many threads as the system can handle.
    ///
    /// This function is blocking, with no real way of stopping it (except the socket being
    /// forcefully closed by the OS or the program being killed)
    pub fn serve<F>(&self, handler: F)
    where
        F: Fn(Request) -> Response + Send + Sync + 'static + Clone,
    {
        let threadpool = ThreadPool::new(
            std::thread::available_parallelism()
                .map(|x| x.into())
                .unwrap_or(4),
        );
        for stream in self.listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    let handler = handler.clone();
                    if !threadpool.execute(move || handle_stream(&mut stream, &handler)) {
                        tracing::error!("worker pool is gone, dropping connection");
                    }
                }
                Err(err) => tracing::warn!(error = %err, "failed to accept connection"),
            }
        }
    }

    /// Utility function for one-shot servers.
    ///
    /// This is mostly for testing, it listens to a single connection, processes the
    /// request and exit.
    pub fn serve_once<F>(&self, handler: F)
    where
        F: Fn(Request) -> Response,
    {
        self.serve_n(1, handler)
    }

    /// Handle `count` connections one after the other, then return
    pub fn serve_n<F>(&self, count: usize, handler: F)
    where
        F: Fn(Request) -> Response,
    {
        for stream in self.listener.incoming().take(count) {
            match stream {
                Ok(mut stream) => handle_stream(&mut stream, &handler),
                Err(err) => tracing::warn!(error = %err, "failed to accept connection"),
            }
        }
    }
}

/// Parse an HTTP request from a TCP stream, calls the handler and write back the answer
fn handle_stream<F>(mut stream: &mut TcpStream, handler: F)
where
    F: Fn(Request) -> Response,
{
    let buf_reader = BufReader::new(&mut stream);
    match parse_request(buf_reader) {
        Ok(req) => {
            tracing::debug!(method = %req.method, path = %req.path, "handling request");
            respond(stream, handler(req))
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejecting unparseable request");
            respond(stream, Response::error(400, "Bad Request"))
        }
    }
}

/// Writes an HTTP response to a stream
fn respond(stream: &mut TcpStream, resp: Response) {
    let code = resp.status.unwrap_or(500);
    let status = stream.write_all(
        format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            code,
            code_to_string(code),
            resp.body.len(),
            resp.headers
                .iter()
                .filter(|(k, _)| !k.eq_ignore_ascii_case("Content-Length"))
                .map(|(k, v)| format!("{}: {}\r\n", k, v))
                .collect::<String>(),
            resp.body
        )
        .as_bytes(),
    );

    if let Err(err) = status {
        tracing::warn!(error = %err, "failed to respond");
    }
}
