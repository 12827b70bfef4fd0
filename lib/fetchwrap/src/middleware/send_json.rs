//! JSON request encoding middleware.

use crate::{Body, FetchFuture, FetchOptions, JSON_CONTENT_TYPE, Merge, Middleware, Next};

/// Middleware sending structured bodies as JSON.
///
/// Sets `Content-Type: application/json`, replacing any value the caller
/// gave under any spelling of the header name. A [`Body::Json`] is serialized to text; datetimes become
/// `YYYY-MM-DDTHH:MM:SS.sssZ` strings. Text bodies are sent as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendJson;

impl Middleware for SendJson {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        let mut overlay = FetchOptions::new().with_header("Content-Type", JSON_CONTENT_TYPE);

        if let Some(Body::Json(json)) = options.body() {
            match json.to_json_string() {
                Ok(text) => overlay = overlay.with_body(text),
                Err(err) => return Box::pin(async move { Err(err) }),
            }
        }

        next.run(url, options.merged(&overlay))
    }
}
