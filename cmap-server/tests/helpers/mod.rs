//! Shared test helpers: counting mock geocoder and multipart request builder

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use cmap_common::Coordinates;
use cmap_server::geocode::CoordinateResolver;
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BOUNDARY: &str = "cmap-test-boundary";

/// Resolver backed by a fixed table; counts every call
pub struct MockResolver {
    known: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl MockResolver {
    pub fn new(known: &[(&str, f64, f64)]) -> Self {
        Self {
            known: known
                .iter()
                .map(|(loc, lat, lon)| (loc.to_string(), Coordinates::new(*lat, *lon)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoordinateResolver for MockResolver {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known.get(location).copied()
    }
}

/// Multipart body with one field; `filename` makes it a file field
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: text/csv\r\n\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST /generate-map with a multipart body
pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate-map")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Upload `content` as the `file` field under `filename`
pub fn csv_upload(filename: &str, content: &str) -> Request<Body> {
    upload_request(multipart_body("file", Some(filename), content.as_bytes()))
}

pub async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
