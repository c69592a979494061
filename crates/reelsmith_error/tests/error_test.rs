use reelsmith_error::{
    ConfigError, GeminiError, GeminiErrorKind, MergeError, MergeErrorKind, ReelsmithError,
    ReelsmithErrorKind, ReelsmithResult, RetryableError, StorageError, StorageErrorKind,
};

#[test]
fn test_error_captures_caller_location() {
    let err = ConfigError::new("bad value");
    assert!(err.file.ends_with("error_test.rs"));
    assert!(err.line > 0);
}

#[test]
fn test_kind_conversion_preserves_variant() {
    let err: ReelsmithError = StorageError::new(StorageErrorKind::Upload("denied".into())).into();
    match err.kind() {
        ReelsmithErrorKind::Storage(inner) => {
            assert_eq!(inner.kind, StorageErrorKind::Upload("denied".into()));
        }
        other => panic!("unexpected kind: {other}"),
    }
}

#[test]
fn test_question_mark_converts_domain_errors() {
    fn merge() -> ReelsmithResult<()> {
        Err(MergeError::new(MergeErrorKind::NoSegments))?
    }

    let err = merge().unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Merge(_)));
    assert!(err.to_string().contains("No video segments"));
}

#[test]
fn test_only_unavailable_signals_are_retryable() {
    let unavailable = GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 429,
        message: r#"{"error":{"status":"UNAVAILABLE"}}"#.into(),
    });
    assert!(unavailable.is_retryable());

    assert!(GeminiError::new(GeminiErrorKind::Unavailable("busy".into())).is_retryable());
    assert!(GeminiError::new(GeminiErrorKind::EmptyResponse).is_retryable());

    let quota = GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 429,
        message: "quota exceeded".into(),
    });
    assert!(!quota.is_retryable());
    assert!(!GeminiError::new(GeminiErrorKind::ResponseParse("eof".into())).is_retryable());
}
