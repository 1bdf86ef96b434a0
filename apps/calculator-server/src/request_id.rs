use http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the per-request correlation id.
#[must_use]
pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// Generates a UUID v4 request id when the client did not send one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
