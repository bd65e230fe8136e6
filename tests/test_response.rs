use webhost::error::ServerError;
use webhost::http::response::{Response, ResponseBuilder, StatusCode};
use webhost::http::writer::{ResponseWriter, serialize_response};
use webhost::router::descriptor::{ResponseDescriptor, TextEncoding};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Found.as_u16(), 302);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Unauthorized.as_u16(), 401);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok).body(body.clone()).build();

    assert_eq!(response.header("Content-Length"), Some("16"));
    assert_eq!(response.header("Connection"), Some("close"));
}

#[test]
fn test_binary_descriptor_has_no_charset() {
    let desc = ResponseDescriptor::new(vec![1u8, 2, 3], "image/png");
    let response = Response::from(desc);

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("image/png"));
    assert_eq!(response.body, vec![1, 2, 3]);
}

#[test]
fn test_text_descriptor_carries_charset() {
    let desc = ResponseDescriptor::new("body {}", "text/css").with_encoding(TextEncoding::Utf8);
    let response = Response::from(desc);

    assert_eq!(response.header("Content-Type"), Some("text/css; charset=utf-8"));
}

#[test]
fn test_redirect_descriptor_sends_location_without_body() {
    let response = Response::from(ResponseDescriptor::redirect("/login"));

    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.header("Location"), Some("/login"));
    assert!(response.body.is_empty());
}

#[test]
fn test_errors_map_to_status() {
    let missing = ServerError::ContentNotFound {
        path: "/srv/site/x.css".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(Response::from_error(&missing).status, StatusCode::NotFound);
    assert_eq!(
        Response::from_error(&ServerError::RouteNotFound { path: "/a.xyz".into() }).status,
        StatusCode::NotFound
    );
    assert_eq!(ServerError::ExpiredSession.status(), StatusCode::Unauthorized);
    assert_eq!(ServerError::NotAuthorized.status(), StatusCode::Forbidden);
    assert_eq!(ServerError::Validation("x".into()).status(), StatusCode::BadRequest);
    assert_eq!(
        ServerError::ServerFault("x".into()).status(),
        StatusCode::InternalServerError
    );
}

#[test]
fn test_serialized_response_layout() {
    let response = ResponseBuilder::new(StatusCode::NotFound)
        .body(b"gone".to_vec())
        .build();
    let bytes = serialize_response(&response);
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(text.contains("Content-Length: 4\r\n"));
    assert!(text.ends_with("\r\n\r\ngone"));
}

#[test]
fn test_serialized_headers_are_sorted_by_name() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-Trace", "1")
        .header("Content-Type", "text/plain")
        .body(b"ok".to_vec())
        .build();
    let text = String::from_utf8(serialize_response(&response).to_vec()).unwrap();

    assert_eq!(
        text,
        "HTTP/1.1 200 OK\r\n\
         Connection: close\r\n\
         Content-Length: 2\r\n\
         Content-Type: text/plain\r\n\
         X-Trace: 1\r\n\
         \r\n\
         ok"
    );
}

#[tokio::test]
async fn test_writer_drains_the_whole_response() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(vec![b'x'; 64 * 1024])
        .build();
    let mut writer = ResponseWriter::new(&response);
    let expected = serialize_response(&response);

    let mut sink = Vec::new();
    writer.write_to_stream(&mut sink).await.unwrap();

    assert_eq!(sink, expected.to_vec());
}
