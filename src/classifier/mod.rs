//! Remote intent classification over HTTP

mod client;
mod protocol;

pub use client::ClassifierClient;
pub use protocol::InterpretResponse;

#[cfg(test)]
pub(crate) use client::tests::serve_once;
