//! Stateless request builder for one resource route.
//!
//! # Design
//! `ResourceClient` holds only the resolved collection URL (`{base}/{route}`)
//! and produces `HttpRequest` values for the five REST shapes the catalog API
//! exposes. It never touches the network; the adapter hands the requests to
//! a `Transport`.

use std::fmt::Display;

use crate::http::{HttpMethod, HttpRequest};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Builds requests against `{base_url}/{route}`.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    collection_url: String,
}

impl ResourceClient {
    pub fn new(base_url: &str, route: &str) -> Self {
        Self {
            collection_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                route.trim_matches('/')
            ),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get<I: Display + ?Sized>(&self, id: &I) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{id}", self.collection_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST the serialized DTO to the collection URL.
    pub fn build_create(&self, body: String) -> HttpRequest {
        self.json_request(HttpMethod::Post, body)
    }

    /// PUT the serialized DTO to the collection URL; the id travels in the body.
    pub fn build_update(&self, body: String) -> HttpRequest {
        self.json_request(HttpMethod::Put, body)
    }

    pub fn build_delete<I: Display + ?Sized>(&self, id: &I) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.collection_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request(&self, method: HttpMethod, body: String) -> HttpRequest {
        HttpRequest {
            method,
            path: self.collection_url.clone(),
            headers: vec![(
                JSON_CONTENT_TYPE.0.to_string(),
                JSON_CONTENT_TYPE.1.to_string(),
            )],
            body: Some(body),
        }
    }
}
