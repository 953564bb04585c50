//! Tiny HTTP/1.1 server serving a release listing and its files from memory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct ListingServer {
    /// Base URL with a trailing slash.
    pub base_url: String,
}

/// Serve `routes` as 200 responses; any other path answers `fallback_status`.
pub fn start(routes: Vec<(&str, Vec<u8>)>, fallback_status: u16) -> ListingServer {
    let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, body)| (path.to_string(), body))
            .collect(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes, fallback_status));
        }
    });
    ListingServer {
        base_url: format!("http://127.0.0.1:{port}/"),
    }
}

pub fn listing_html(hrefs: &[&str]) -> Vec<u8> {
    let mut html = String::from("<html><body><h1>Index of /ftp/python/3.14.0/</h1><pre>\n");
    for href in hrefs {
        html.push_str(&format!("<a href=\"{href}\">{href}</a>   07-Oct-2025 12:00   42\n"));
    }
    html.push_str("</pre></body></html>\n");
    html.into_bytes()
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Vec<u8>>, fallback_status: u16) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
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
    let (status, body) = match routes.get(&path) {
        Some(body) => (200, body.clone()),
        None => (fallback_status, Vec::new()),
    };
    let head = format!(
        "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}
