//! One-call `send` with no active handle: initialization failures fold
//! into the result instead of raising. Kept in its own binary because
//! it exercises the process-wide default handle.

use fcm_notify::{is_initialized, send, NotificationPayload};

#[tokio::test]
async fn test_auto_init_failure_becomes_failed_result() {
    std::env::remove_var("FIREBASE_SERVICE_ACCOUNT_PATH");
    std::env::remove_var("FIREBASE_APP_NAME");
    assert!(!is_initialized());

    // No credential file at the default path in the test directory, so
    // auto-initialization fails and the failure surfaces in the result.
    let result = send("tok", &NotificationPayload::new("Hi", "There"), None).await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("not found at path"));
    assert!(!is_initialized());
}
