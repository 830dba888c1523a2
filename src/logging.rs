//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Password fields in submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(body_bytes) => body_bytes,
        Err(response) => return response,
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    if parts.method == Method::POST
        && parts.headers.get(CONTENT_TYPE)
            == Some(&HeaderValue::from_static(
                "application/x-www-form-urlencoded",
            ))
    {
        let display_text = REDACTED_FIELDS
            .iter()
            .fold(body_text.to_string(), |text, field| {
                redact_form_field(&text, field)
            });
        log_body("Received request", &parts, &display_text);
    } else {
        log_body("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(body_bytes) => body_bytes,
        Err(response) => return response,
    };
    log_body(
        "Sending response",
        &parts,
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Result<Bytes, Response> {
    axum::body::to_bytes(body, usize::MAX).await.map_err(|error| {
        tracing::error!("Could not read body for logging: {error}");
        axum::http::StatusCode::BAD_REQUEST.into_response()
    })
}

/// Replace the value of every `field_name=...` pair in a URL encoded form with asterisks.
fn redact_form_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name == field_name => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The longest prefix of `text` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character.
fn truncate(text: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{message}: {parts:#?}\nbody: {:}...", truncate(body));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form_field, truncate};

    #[test]
    fn redacts_password_fields_only() {
        let form = "email=juan%40example.com&password=hunter2&confirm_password=hunter2";

        let redacted = redact_form_field(form, "password");
        let redacted = redact_form_field(&redacted, "confirm_password");

        assert_eq!(
            redacted,
            "email=juan%40example.com&password=********&confirm_password=********"
        );
    }

    #[test]
    fn truncate_keeps_whole_characters() {
        let text = "₱".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&text);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(truncated.chars().all(|c| c == '₱'));
    }

    #[tokio::test]
    async fn passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);

        let response = server
            .post("/echo")
            .text("password=hunter2&receipt=₱1,650.00 for a long enough body to be truncated")
            .await;

        response.assert_text(
            "password=hunter2&receipt=₱1,650.00 for a long enough body to be truncated",
        );
    }
}
