//! Standard middlewares.
//!
//! Each middleware adds one behavior to a composed fetch and knows nothing
//! about the others. They are listed outermost first when composing:
//!
//! ```ignore
//! use fetchwrap::FetchWrap;
//! use fetchwrap::middleware::{Logger, ReceiveJson, SendJson, UrlParams};
//!
//! let fetch = FetchWrap::builder(base)
//!     .with(Logger::new())
//!     .with(UrlParams::default())
//!     .with(SendJson)
//!     .with(ReceiveJson::new().accept_header(true))
//!     .build();
//! ```
//!
//! # Available Middlewares
//!
//! - [`Logger`] - Logs requests and failures to a [`LogSink`]
//! - [`OptionsByUrlPattern`] - Merges default options by URL pattern
//! - [`UrlParams`] - Fills `{token}`s and builds the query string
//! - [`SendJson`] - Serializes structured bodies
//! - [`ReceiveJson`] - Checks the status and parses JSON replies
//! - [`Testing`] - Spies and mocks
//!
//! Closures become middlewares through [`middleware_fn`](crate::middleware_fn).

mod logger;
mod options_by_url_pattern;
mod receive_json;
mod send_json;
mod testing;
mod url_params;

pub use logger::{LogSink, Logger, TracingSink};
pub use options_by_url_pattern::OptionsByUrlPattern;
pub use receive_json::{ReceiveJson, decode_response};
pub use send_json::SendJson;
pub use testing::Testing;
pub use url_params::UrlParams;
