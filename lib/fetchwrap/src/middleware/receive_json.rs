//! JSON response decoding middleware.

use tracing::debug;

use crate::{
    Error, FetchFuture, FetchOptions, JSON_CONTENT_TYPE, Merge, Middleware, Next, Reply, Response,
    Result, parse_revived,
};

/// Middleware turning raw responses into JSON or text replies.
///
/// - a non-2xx response fails with [`Error::Http`]
/// - a `content-type` containing `application/json` is parsed, reviving
///   datetimes; an empty body gives [`Reply::Empty`]
/// - any other response gives [`Reply::Text`]
///
/// Replies that are not raw responses (e.g. from a mock) pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiveJson {
    accept_header: bool,
}

impl ReceiveJson {
    /// Decoder leaving the request untouched.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accept_header: false,
        }
    }

    /// Ask for JSON with `Accept: application/json`, unless the caller
    /// already set an `Accept` header.
    #[must_use]
    pub const fn accept_header(mut self, accept_header: bool) -> Self {
        self.accept_header = accept_header;
        self
    }
}

impl Middleware for ReceiveJson {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        let options = if self.accept_header {
            FetchOptions::new()
                .with_header("Accept", JSON_CONTENT_TYPE)
                .merged(&options)
        } else {
            options
        };
        let reply = next.run(url, options);

        Box::pin(async move {
            match reply.await? {
                Reply::Response(response) => decode_response(response),
                other => Ok(other),
            }
        })
    }
}

/// Decode a raw response the way [`ReceiveJson`] does.
///
/// # Errors
///
/// Returns [`Error::Http`] for a non-2xx status and [`Error::JsonParse`] for
/// a JSON response whose body does not parse.
pub fn decode_response(response: Response) -> Result<Reply> {
    if !response.ok() {
        debug!(status = response.status(), "http error response");
        return Err(Error::http(response));
    }

    let is_json = response
        .header("content-type")
        .is_some_and(|content_type| content_type.contains(JSON_CONTENT_TYPE));
    let text = response.text();

    if !is_json {
        return Ok(Reply::Text(text));
    }
    if text.is_empty() {
        return Ok(Reply::Empty);
    }
    Ok(Reply::Json(parse_revived(&text)?))
}
