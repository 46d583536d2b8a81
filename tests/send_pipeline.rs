//! Library-level pipeline tests: factory lifecycle and the full
//! validate/build/submit flow over a recording transport.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fcm_notify::errors::TransportError;
use fcm_notify::messaging::{Message, MessageTransport, Messaging};
use fcm_notify::{create_client, NotificationOptions, NotificationPayload, Priority};

fn fixture_path() -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service-account.json"
    ))
}

struct RecordingTransport {
    submitted: Mutex<Vec<Message>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            submitted: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn submit(&self, message: &Message) -> Result<String, TransportError> {
        self.submitted.lock().unwrap().push(message.clone());
        Ok("projects/demo-project/messages/0:1".to_string())
    }
}

#[test]
fn test_factory_generates_independent_handles() {
    let first = create_client(fixture_path(), None).expect("first client");
    let second = create_client(fixture_path(), None).expect("second client");

    assert_ne!(first.app().name(), second.app().name());
    assert!(!Arc::ptr_eq(first.app(), second.app()));
}

#[test]
fn test_factory_with_distinct_credential_files() {
    let dir = tempfile::tempdir().unwrap();
    let copy_a = dir.path().join("sa-a.json");
    let copy_b = dir.path().join("sa-b.json");
    fs::copy(fixture_path(), &copy_a).unwrap();
    fs::copy(fixture_path(), &copy_b).unwrap();

    let a = create_client(&copy_a, None).expect("client a");
    let b = create_client(&copy_b, None).expect("client b");
    assert!(!Arc::ptr_eq(a.app(), b.app()));
}

#[test]
fn test_factory_reuses_named_handle() {
    let first = create_client(fixture_path(), Some("pipeline-shared".to_string())).unwrap();
    // Same name, bogus path: the registered handle wins.
    let second =
        create_client("./definitely-missing.json", Some("pipeline-shared".to_string())).unwrap();
    assert!(Arc::ptr_eq(first.app(), second.app()));
}

#[test]
fn test_factory_propagates_credential_errors() {
    let err = create_client("./definitely-missing.json", None).unwrap_err();
    assert!(err.to_string().contains("not found at path"));
}

#[tokio::test]
async fn test_full_pipeline_wire_shape() {
    let transport = RecordingTransport::new();
    let messaging = Messaging::with_transport(transport.clone());

    let payload = NotificationPayload::new("Build finished", "All 312 tests passed")
        .with_data(HashMap::from([("run".to_string(), "8841".to_string())]));
    let options = NotificationOptions {
        badge: Some(1),
        sound: Some("default".to_string()),
        priority: Some(Priority::Normal),
        content_available: false,
        mutable_content: true,
    };

    let result = messaging.send("device-token-1", &payload, Some(&options)).await;
    assert!(result.success);
    assert_eq!(
        result.message_id.as_deref(),
        Some("projects/demo-project/messages/0:1")
    );

    let submitted = transport.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let wire = serde_json::to_value(&submitted[0]).unwrap();
    assert_eq!(wire["token"], "device-token-1");
    assert_eq!(wire["notification"]["title"], "Build finished");
    assert_eq!(wire["data"]["run"], "8841");
    assert_eq!(wire["apns"]["headers"]["apns-priority"], "5");
    let aps = &wire["apns"]["payload"]["aps"];
    assert_eq!(aps["badge"], 1);
    assert_eq!(aps["sound"], "default");
    assert_eq!(aps["mutable-content"], 1);
    assert!(aps.get("content-available").is_none());
}

#[tokio::test]
async fn test_oversized_payload_never_reaches_transport() {
    let transport = RecordingTransport::new();
    let messaging = Messaging::with_transport(transport.clone());

    let payload = NotificationPayload::new("big", "z".repeat(5000));
    let result = messaging.send("tok", &payload, None).await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("exceeds size limit"));
    assert_eq!(transport.submitted.lock().unwrap().len(), 0);
}
