//! `x-request-id` handling shared by the API server and its clients.

use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns a fresh UUID to requests that arrive without an id.
#[must_use]
pub fn assign_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies the request's id onto the response so callers can correlate logs.
#[must_use]
pub fn echo_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Text of an id installed by [`assign_request_id`]; empty when absent or not
/// valid header text.
#[must_use]
pub fn request_id_text(id: Option<&RequestId>) -> &str {
    id.and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use tower_http::request_id::RequestId;

    use super::*;

    #[test]
    fn request_id_text_reads_header_value() {
        let id = RequestId::new("req-7".parse().expect("valid header value"));
        assert_eq!(request_id_text(Some(&id)), "req-7");
        assert_eq!(request_id_text(None), "");
    }
}
