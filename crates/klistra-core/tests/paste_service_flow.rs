use std::sync::Arc;
use std::time::Duration;

use klistra_core::crypto::{derive_key, transport, Salt, TransportKey};
use klistra_core::storage::Paste;
use klistra_core::{
    CreatePasteRequest, IdGenerator, KlistraError, ManualClock, MemorySessions, PasteResponse,
    PasteService, PasteStore, PasteView, ReadPasteRequest, SessionHandle, SqlitePasteStore,
};

struct Harness {
    service: PasteService,
    store: Arc<SqlitePasteStore>,
    clock: Arc<ManualClock>,
}

fn harness(seed: u64) -> Harness {
    let clock = Arc::new(ManualClock::starting_now());
    let store = Arc::new(
        SqlitePasteStore::open_in_memory()
            .expect("in-memory store should open")
            .with_clock(clock.clone()),
    );
    let service = PasteService::new(store.clone(), Arc::new(MemorySessions::new()))
        .with_id_generator(IdGenerator::seeded(seed));
    Harness {
        service,
        store,
        clock,
    }
}

fn plain(response: PasteResponse) -> PasteView {
    match response {
        PasteResponse::Plain(view) => view,
        PasteResponse::Sealed(_) => panic!("expected a plain response"),
    }
}

#[test]
fn test_protected_paste_round_trip() {
    let h = harness(1);
    let session = SessionHandle::random();

    let id = h
        .service
        .create(
            &session,
            &CreatePasteRequest::new("hello", 60).protected_by("secret1"),
        )
        .expect("create should succeed");

    let status = h.service.status(&id).expect("status should succeed");
    assert_eq!(status.id, id);
    assert!(status.protected);

    let wrong = h
        .service
        .read(&session, &ReadPasteRequest::new(&id, "wrong"))
        .unwrap_err();
    assert!(wrong.is_authentication());

    let missing = h
        .service
        .read(&session, &ReadPasteRequest::new(&id, ""))
        .unwrap_err();
    assert!(missing.is_authentication());

    let view = plain(
        h.service
            .read(&session, &ReadPasteRequest::new(&id, "secret1"))
            .expect("read should succeed"),
    );
    assert_eq!(view.text, "hello");
    assert!(view.protected);
    assert_eq!(view.files, None);
}

#[test]
fn test_unprotected_paste_opens_with_id_alone() {
    let h = harness(2);
    let session = SessionHandle::random();

    let id = h
        .service
        .create(&session, &CreatePasteRequest::new("world", 3600))
        .expect("create should succeed");

    assert!(!h.service.status(&id).unwrap().protected);

    // Any supplied password is ignored for unprotected pastes.
    let view = plain(
        h.service
            .read(&session, &ReadPasteRequest::new(&id, "ignored"))
            .expect("read should succeed"),
    );
    assert_eq!(view.text, "world");
    assert!(!view.protected);
}

#[test]
fn test_record_at_rest_is_ciphertext() {
    let h = harness(3);
    let session = SessionHandle::random();

    let id = h
        .service
        .create(
            &session,
            &CreatePasteRequest::new("plainly visible?", 60).protected_by("secret1"),
        )
        .unwrap();

    let record = h.store.get(&id).unwrap();
    assert!(!record.contains("plainly visible?"));
    assert!(!record.contains("secret1"));

    let paste = Paste::from_record(&record).unwrap();
    assert_eq!(paste.id, id);
    assert!(paste.protected);
    assert!(paste.text.is_some());
}

#[test]
fn test_derivation_depends_on_salt_and_password() {
    let h = harness(4);
    let session = SessionHandle::random();
    let id = h
        .service
        .create(
            &session,
            &CreatePasteRequest::new("hello", 60).protected_by("secret1"),
        )
        .unwrap();

    let paste = Paste::from_record(&h.store.get(&id).unwrap()).unwrap();
    let sealed = paste.text.expect("text should be stored");
    let salt = Salt::from_base64(&paste.salt).unwrap();

    let right = derive_key(b"secret1", &salt).unwrap();
    assert_eq!(
        klistra_core::crypto::content::decrypt(&sealed, &right).unwrap(),
        b"hello"
    );

    let other_salt = derive_key(b"secret1", &Salt::random().unwrap()).unwrap();
    assert!(klistra_core::crypto::content::decrypt(&sealed, &other_salt).is_err());

    let other_password = derive_key(b"secret2", &salt).unwrap();
    assert!(klistra_core::crypto::content::decrypt(&sealed, &other_password).is_err());
}

#[test]
fn test_expired_paste_is_gone() {
    let h = harness(5);
    let session = SessionHandle::random();
    let id = h
        .service
        .create(&session, &CreatePasteRequest::new("brief", 60))
        .unwrap();

    h.clock.advance(Duration::from_secs(61));

    assert!(h.service.status(&id).unwrap_err().is_not_found());
    let err = h
        .service
        .read(&session, &ReadPasteRequest::new(&id, ""))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(h.store.row_count().unwrap(), 0);
}

#[test]
fn test_timeout_unix_follows_expiry() {
    let h = harness(6);
    let session = SessionHandle::random();
    let created_at = klistra_core::Clock::unix_now(h.clock.as_ref());

    let id = h
        .service
        .create(&session, &CreatePasteRequest::new("t", 600))
        .unwrap();
    let view = plain(
        h.service
            .read(&session, &ReadPasteRequest::new(&id, ""))
            .unwrap(),
    );
    assert_eq!(view.timeout_unix, created_at + 600);
}

#[test]
fn test_paste_expires_exactly_at_timeout_unix() {
    let h = harness(13);
    let session = SessionHandle::random();
    let start = klistra_core::Clock::unix_now(h.clock.as_ref());

    let id = h
        .service
        .create(&session, &CreatePasteRequest::new("edge", 120))
        .unwrap();
    let timeout_unix = plain(
        h.service
            .read(&session, &ReadPasteRequest::new(&id, ""))
            .unwrap(),
    )
    .timeout_unix;

    h.clock
        .advance(Duration::from_secs((timeout_unix - start) as u64));
    assert!(h.service.status(&id).is_ok());

    h.clock.advance(Duration::from_secs(1));
    assert!(h.service.status(&id).unwrap_err().is_not_found());
}

#[test]
fn test_last_created_tracks_session() {
    let h = harness(7);
    let session = SessionHandle::random();
    let other = SessionHandle::random();

    assert_eq!(h.service.last_created(&session).unwrap(), None);

    let first = h
        .service
        .create(&session, &CreatePasteRequest::new("one", 60))
        .unwrap();
    assert_eq!(h.service.last_created(&session).unwrap(), Some(first));

    let second = h
        .service
        .create(&session, &CreatePasteRequest::new("two", 60))
        .unwrap();
    assert_eq!(h.service.last_created(&session).unwrap(), Some(second));
    assert_eq!(h.service.last_created(&other).unwrap(), None);
}

#[test]
fn test_files_are_encrypted_with_paste_key() {
    let h = harness(8);
    let session = SessionHandle::random();
    let files = vec![
        "https://files.example/a.png".to_string(),
        "https://files.example/b.pdf".to_string(),
    ];

    let id = h
        .service
        .create(
            &session,
            &CreatePasteRequest::new("", 60)
                .protected_by("secret1")
                .with_files(files.clone()),
        )
        .unwrap();

    let record = h.store.get(&id).unwrap();
    assert!(!record.contains("files.example"));
    assert!(Paste::from_record(&record).unwrap().text.is_none());

    let view = plain(
        h.service
            .read(&session, &ReadPasteRequest::new(&id, "secret1"))
            .unwrap(),
    );
    assert_eq!(view.text, "");
    assert_eq!(view.files, Some(files));
}

#[test]
fn test_transport_session_seals_responses() {
    let h = harness(9);
    let session = SessionHandle::random();
    let key = TransportKey::from_hex(&h.service.transport_key(&session).unwrap()).unwrap();

    let create_body = transport::encrypt_json(
        &serde_json::json!({
            "pasteText": "over the wire",
            "pass": "secret1",
            "passProtect": true,
            "expiry": 120
        }),
        &key,
    )
    .unwrap();
    let request: CreatePasteRequest = h.service.decode_request(&session, &create_body).unwrap();
    let id = h.service.create(&session, &request).unwrap();

    let read_body =
        transport::encrypt_json(&ReadPasteRequest::new(&id, "secret1"), &key).unwrap();
    let request: ReadPasteRequest = h.service.decode_request(&session, &read_body).unwrap();

    let response = h.service.read(&session, &request).unwrap();
    assert!(response.is_sealed());

    let body = response.body().unwrap();
    assert!(!body.contains("over the wire"));

    let view: PasteView = transport::decrypt_json(&body, &key).unwrap();
    assert_eq!(view.id, id);
    assert_eq!(view.text, "over the wire");
}

#[test]
fn test_envelope_under_foreign_key_is_rejected() {
    let h = harness(10);
    let session = SessionHandle::random();
    h.service.transport_key(&session).unwrap();

    let foreign = TransportKey::generate().unwrap();
    let body = transport::encrypt_json(&ReadPasteRequest::new("apple42", ""), &foreign).unwrap();

    let result: Result<ReadPasteRequest, KlistraError> =
        h.service.decode_request(&session, &body);
    assert!(matches!(result, Err(KlistraError::Authentication(_))));
}

#[test]
fn test_invalid_requests_leave_store_empty() {
    let h = harness(11);
    let session = SessionHandle::random();

    let too_long = "p".repeat(101);
    let cases = [
        CreatePasteRequest::new("x", 59),
        CreatePasteRequest::new("x", 604_801),
        CreatePasteRequest::new("x", 60).protected_by(""),
        CreatePasteRequest::new("x", 60).protected_by(too_long),
        CreatePasteRequest::new("", 60),
    ];

    for request in &cases {
        let err = h.service.create(&session, request).unwrap_err();
        assert!(matches!(err, KlistraError::InvalidInput(_)), "{:?}", request);
    }
    assert_eq!(h.store.row_count().unwrap(), 0);
}

#[test]
fn test_ids_stay_unique_across_many_creates() {
    let h = harness(12);
    let session = SessionHandle::random();
    let mut seen = std::collections::HashSet::new();

    for n in 0..8 {
        let id = h
            .service
            .create(&session, &CreatePasteRequest::new(format!("paste {}", n), 60))
            .unwrap();
        assert!(seen.insert(id));
    }
    assert_eq!(h.store.row_count().unwrap(), 8);
}
