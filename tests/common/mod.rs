//! Loopback HTTP listener shared by the integration tests

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::task::{Context, Poll, Waker};
use std::thread;

use serde_json::Value;

/// A request as received by the test listener
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body is not JSON")
    }
}

/// Accept one connection, record it, answer with `status`
pub fn serve_once(status: u16) -> (String, thread::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let captured = read_request(&mut stream);

        let reason = if status < 300 { "OK" } else { "Error" };
        let body = r#"{"status": 1}"#;
        write!(
            stream,
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        captured
    });

    (format!("http://{}", addr), handle)
}

fn read_request(stream: &mut TcpStream) -> Captured {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers
        .iter()
        .any(|(k, v)| k == "transfer-encoding" && v.eq_ignore_ascii_case("chunked"));

    let body = if let Some(len) = content_length {
        let mut body = vec![0; len];
        reader.read_exact(&mut body).unwrap();
        body
    } else if chunked {
        read_chunked(&mut reader)
    } else {
        Vec::new()
    };

    Captured {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    }
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).unwrap();
        let size_hex = size_line.trim().split(';').next().unwrap_or("0");
        let size = usize::from_str_radix(size_hex, 16).unwrap();

        if size == 0 {
            let mut trailer = String::new();
            reader.read_line(&mut trailer).unwrap();
            break;
        }

        let mut chunk = vec![0; size];
        reader.read_exact(&mut chunk).unwrap();
        body.extend_from_slice(&chunk);

        let mut crlf = String::new();
        reader.read_line(&mut crlf).unwrap();
    }
    body
}

/// Poll a future to completion on the current thread with no runtime
pub fn block_on_without_runtime<F: Future>(fut: F) -> F::Output {
    let mut fut = std::pin::pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
        thread::yield_now();
    }
}
