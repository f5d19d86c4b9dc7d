//! Integration tests for `EventPublisher`.

mod support;

use std::sync::Arc;

use peek_core::{Clock, EventPublisher, RsvpService};
use peek_domain::constants::EVENTS_COLLECTION;
use peek_domain::{EventDraft, EventEdit, ImageUpload, PeekError};
use serde_json::json;

use support::fixtures::{owned_event_doc, FixedClock};
use support::mocks::{MockDocumentStore, RecordingUploader, StaticAuth};

fn draft() -> EventDraft {
    EventDraft {
        title: "  Jazz Night ".into(),
        category: "Music".into(),
        description: "Live trio".into(),
        date: "20/06/2030".into(),
        time: "07:00 PM - 10:00 PM".into(),
        location: "Town Hall".into(),
        zone_label: "North".into(),
    }
}

fn photo() -> ImageUpload {
    ImageUpload::new("poster.PNG", Some("image/png".into()), vec![0x89, 0x50, 0x4e, 0x47])
}

fn edit() -> EventEdit {
    EventEdit {
        title: "Jazz Night (moved)".into(),
        category: "Music".into(),
        date: "21/06/2030".into(),
        time: "08:00 PM - 11:00 PM".into(),
        location: "Riverside".into(),
        zone_label: "South".into(),
    }
}

fn publisher(
    store: &Arc<MockDocumentStore>,
    auth: Arc<StaticAuth>,
    media: &Arc<RecordingUploader>,
) -> EventPublisher {
    EventPublisher::new(store.clone(), auth, media.clone())
        .with_clock(Arc::new(FixedClock::on(2030, 6, 15)))
}

#[tokio::test]
async fn create_uploads_image_then_writes_record() {
    let store = MockDocumentStore::new();
    let media = RecordingUploader::new();
    let millis = FixedClock::on(2030, 6, 15).now().timestamp_millis();

    let record = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .create_event(draft(), photo())
        .await
        .expect("create");

    let path = format!("event_images/events-0001/{millis}.png");
    assert_eq!(media.uploads(), vec![path.clone()]);
    assert_eq!(record.id(), "events-0001");
    assert_eq!(record.title, "Jazz Night");
    assert_eq!(record.attendee_count(), 0);
    assert!(record.is_created_by("creator"));
    assert_eq!(record.image_url(), Some(format!("https://cdn.test/{path}").as_str()));

    let stored = store.document(EVENTS_COLLECTION, "events-0001").expect("stored");
    assert_eq!(stored["eventId"], json!("events-0001"));
    assert_eq!(stored["creatorId"], json!("creator"));
    assert_eq!(stored["rsvpList"], json!({}));
}

#[tokio::test]
async fn create_requires_sign_in() {
    let store = MockDocumentStore::new();
    let media = RecordingUploader::new();

    let err = publisher(&store, StaticAuth::signed_out(), &media)
        .create_event(draft(), photo())
        .await
        .unwrap_err();

    assert_eq!(err, PeekError::Unauthenticated);
    assert!(media.uploads().is_empty());
}

#[tokio::test]
async fn create_rejects_blank_fields_and_empty_images() {
    let store = MockDocumentStore::new();
    let media = RecordingUploader::new();
    let publisher = publisher(&store, StaticAuth::signed_in("creator"), &media);

    let mut blank = draft();
    blank.location = "   ".into();
    let err = publisher.create_event(blank, photo()).await.unwrap_err();
    assert!(matches!(err, PeekError::InvalidInput(_)));

    let empty = ImageUpload::new("poster.png", None, Vec::new());
    let err = publisher.create_event(draft(), empty).await.unwrap_err();
    assert!(matches!(err, PeekError::InvalidInput(_)));

    assert!(media.uploads().is_empty());
    assert_eq!(store.set_calls(), 0);
}

#[tokio::test]
async fn failed_upload_writes_nothing() {
    let store = MockDocumentStore::new();
    let media = RecordingUploader::failing();

    let err = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .create_event(draft(), photo())
        .await
        .unwrap_err();

    assert!(matches!(err, PeekError::UploadFailed(_)));
    assert_eq!(store.set_calls(), 0);
}

#[tokio::test]
async fn rejected_record_write_is_write_failed() {
    let store = MockDocumentStore::new();
    store.fail_writes(true);
    let media = RecordingUploader::new();

    let err = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .create_event(draft(), photo())
        .await
        .unwrap_err();

    assert!(matches!(err, PeekError::WriteFailed(_)));
}

#[tokio::test]
async fn update_keeps_identity_and_attendance() {
    let store = MockDocumentStore::new();
    store.seed(EVENTS_COLLECTION, "e1", owned_event_doc("e1", "creator", &["u1", "u2"]));
    let media = RecordingUploader::new();

    let record = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .update_event("e1", edit())
        .await
        .expect("update");

    assert_eq!(record.title, "Jazz Night (moved)");
    assert_eq!(record.location, "Riverside");
    assert_eq!(record.attendee_count(), 2);
    assert!(record.is_attending("u1"));

    let stored = store.document(EVENTS_COLLECTION, "e1").expect("stored");
    assert_eq!(stored["zone"], json!("South"));
    assert_eq!(stored["creatorId"], json!("creator"));
    assert_eq!(stored["attendeeCount"], json!(2));
}

#[tokio::test]
async fn update_rereads_so_concurrent_rsvps_survive() {
    let store = MockDocumentStore::new();
    store.seed(EVENTS_COLLECTION, "e1", owned_event_doc("e1", "creator", &[]));
    let media = RecordingUploader::new();

    RsvpService::new(store.clone(), StaticAuth::signed_in("u9"))
        .toggle_attendance("e1")
        .await
        .expect("rsvp");
    let record = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .update_event("e1", edit())
        .await
        .expect("update");

    assert!(record.is_attending("u9"));
    assert_eq!(record.attendee_count(), 1);
}

#[tokio::test]
async fn update_of_missing_event_is_not_found() {
    let store = MockDocumentStore::new();
    let media = RecordingUploader::new();

    let err = publisher(&store, StaticAuth::signed_in("creator"), &media)
        .update_event("ghost", edit())
        .await
        .unwrap_err();

    assert!(matches!(err, PeekError::NotFound(_)));
    assert_eq!(store.set_calls(), 0);
}
