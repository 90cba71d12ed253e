pub mod codec;
pub mod query;

mod document;
mod entry;
mod message;
mod reader;
mod types;
mod writer;

pub use document::Log;
pub use entry::Entry;
pub use message::{HeaderCase, Request, RequestBuilder, Response, calculate_headers_size};
pub use reader::HarReader;
pub use types::*;
pub use writer::{HarWriter, WriteHooks, WriteObserver};
