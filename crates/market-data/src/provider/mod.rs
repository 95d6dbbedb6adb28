//! Quote data source abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteDataSource` trait that all sources implement
//! - The Yahoo Finance source, built on the two-phase crumb/cookie session
//!
//! Sources compose an [`HttpTransport`](crate::transport::HttpTransport) and a
//! [`QuoteParser`](crate::parser::QuoteParser) rather than inheriting fetch
//! logic, so either can be swapped out in tests.

mod traits;

pub mod yahoo;

pub use traits::QuoteDataSource;
