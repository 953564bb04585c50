//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths from memory, answers 404 for anything else and
//! records every requested path so tests can assert what was fetched.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Delay before responding, to make concurrent downloads finish out of order.
    pub delay: Duration,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct FileServer {
    /// Base URL with a trailing slash, e.g. "http://127.0.0.1:12345/".
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FileServer {
    /// Paths served by the server, including the leading `/`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Start a server in a background thread. Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> FileServer {
    let routes: HashMap<String, Route> = routes
        .into_iter()
        .map(|(path, route)| (path.to_string(), route))
        .collect();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });

    FileServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

/// Standard Apache-style listing page with one anchor per href.
pub fn listing_html(hrefs: &[&str]) -> String {
    let mut html = String::from(
        "<html>\r\n<head><title>Index of /ftp/python/3.14.0/</title></head>\r\n<body>\r\n<h1>Index of /ftp/python/3.14.0/</h1><hr><pre>",
    );
    for href in hrefs {
        html.push_str(&format!(
            "<a href=\"{href}\">{href}</a>                 07-Oct-2025 12:00     1234\r\n"
        ));
    }
    html.push_str("</pre><hr></body>\r\n</html>\r\n");
    html
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(path.clone());

    let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
    if !route.delay.is_zero() {
        thread::sleep(route.delay);
    }
    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        route.status,
        reason,
        route.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}
