use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::tracing::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns every request an id, honoring one supplied by the caller, and
/// echoes it back on the response. The id is scoped into the task-local so
/// error payloads can report it.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_default();

    // Generated ids are ASCII; a caller-supplied id passed to_str above.
    let header_value = HeaderValue::from_str(request_id.as_str())
        .expect("request id contains only valid header characters");

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value.clone());
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
    );
    let _guard = span.enter();

    let mut response = crate::tracing::scope_request_id(request_id, async move {
        next.run(request).await
    })
    .await;

    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);

    response
}
