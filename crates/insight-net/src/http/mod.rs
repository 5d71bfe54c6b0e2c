//! HTTP over `reqwest`.
//!
//! One [`HttpClient`] is built per process (or per configured dashboard)
//! and cloned into every source that needs it. Requests are assembled with
//! [`HttpRequestBuilder`] and answered with an [`HttpResponse`].

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig, RedirectPolicy};
pub use request::HttpRequestBuilder;
pub use response::HttpResponse;
