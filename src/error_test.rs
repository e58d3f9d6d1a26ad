use super::*;

#[test]
fn http_error_displays_body_verbatim() {
    let err = SessionError::Http { status: 401, message: "bad creds".into() };
    assert_eq!(err.to_string(), "bad creds");
}

#[test]
fn validation_error_displays_message_verbatim() {
    let err = SessionError::Validation("Please enter your email and password.".into());
    assert_eq!(err.to_string(), "Please enter your email and password.");
}

#[test]
fn malformed_response_mentions_missing_token() {
    assert!(SessionError::MalformedResponse.to_string().contains("missing token"));
}

#[test]
fn error_codes_are_distinct() {
    let codes = [
        SessionError::Validation(String::new()).error_code(),
        SessionError::Http { status: 500, message: String::new() }.error_code(),
        SessionError::MalformedResponse.error_code(),
        SessionError::Parse(String::new()).error_code(),
        SessionError::Transport(String::new()).error_code(),
        SessionError::InvalidUrl(String::new()).error_code(),
        SessionError::Config(String::new()).error_code(),
    ];
    let mut unique = codes.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn invalid_header_value_converts() {
    let err: SessionError = reqwest::header::HeaderValue::from_str("bad\nvalue")
        .unwrap_err()
        .into();
    assert!(matches!(err, SessionError::InvalidHeader(_)));
}
