//! HTTP download-to-file with streaming progress reporting.
//!
//! # Architecture
//!
//! - [`HttpClient`] - trait abstraction over the HTTP transport
//! - [`download_to_file`] - single-pass chunk loop writing to disk
//!
//! The transport reports the response status instead of judging it: callers
//! own the "exactly 200 is success" rule so policy stays in one place.

mod client;
mod download;
mod error;

pub use client::{BoxStream, HttpClient, HttpResponse};
pub use download::{DownloadOutcome, ProgressFn, TransferProgress, download_to_file};
pub use error::{FetchError, Result};

#[cfg(feature = "reqwest")]
pub use client::ReqwestClient;
