//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod vision_error;

pub use http_error::{Error, ErrorKind, Result};
pub use vision_error::RemoteCall;
