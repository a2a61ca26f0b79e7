use notes_core::{
    ClientConfig, HttpNoteRemote, NewNote, Note, NoteId, NoteRemote, RemoteError, SyncController,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_for(server: &MockServer) -> HttpNoteRemote {
    let config = ClientConfig::new(&server.uri()).unwrap();
    HttpNoteRemote::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_all_reads_note_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "content": "buy milk", "important": false },
            { "id": "b7", "content": "call mom", "important": true }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let notes = remote_for(&server).fetch_all().await.unwrap();

    assert_eq!(
        notes,
        vec![
            Note::new(1, "buy milk", false),
            Note::new("b7", "call mom", true)
        ]
    );
}

#[tokio::test]
async fn create_posts_payload_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_json(json!({ "content": "call mom", "important": true })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 2, "content": "call mom", "important": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = NewNote::try_new("call mom", true).unwrap();
    let created = remote_for(&server).create(&draft).await.unwrap();

    assert_eq!(created, Note::new(2, "call mom", true));
}

#[tokio::test]
async fn update_puts_full_note_to_item_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes/1"))
        .and(body_json(
            json!({ "id": 1, "content": "buy milk", "important": true }),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 1, "content": "buy milk", "important": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let changed = Note::new(1, "buy milk", true);
    let returned = remote_for(&server)
        .update(&NoteId::Number(1), &changed)
        .await
        .unwrap();

    assert_eq!(returned, changed);
}

#[tokio::test]
async fn update_of_missing_note_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not\nFound"))
        .mount(&server)
        .await;

    let err = remote_for(&server)
        .update(&NoteId::Number(9), &Note::new(9, "gone", true))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.kind(), "status");
    assert_eq!(err.to_string(), "note service returned HTTP 404: Not Found");
}

#[tokio::test]
async fn delete_accepts_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/notes/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    remote_for(&server)
        .delete(&NoteId::from("abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = remote_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(&format!("{}/api", server.uri())).unwrap();
    let remote = HttpNoteRemote::new(&config).unwrap();
    assert!(remote.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn slow_service_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(&server.uri())
        .unwrap()
        .with_request_timeout(Duration::from_millis(50))
        .unwrap();
    let err = HttpNoteRemote::new(&config)
        .unwrap()
        .fetch_all()
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
}

#[tokio::test]
async fn controller_over_http_toggle_failure_drops_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "content": "buy milk", "important": false }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = ClientConfig::new(&server.uri()).unwrap();
    let controller = SyncController::new(HttpNoteRemote::new(&config).unwrap(), &config);
    assert_eq!(controller.load().await.unwrap(), 1);

    controller
        .toggle_importance(&NoteId::Number(1))
        .await
        .unwrap();

    assert!(controller.snapshot().is_empty());
    assert_eq!(
        controller.notifier().current().as_deref(),
        Some("Note 'buy milk' was already removed from server")
    );
}
