use storage::repository::{SnapshotRepository, Slot};
use storage::sqlite::SqliteRepository;
use storage::{Storage, codec};
use vocab_core::model::{Difficulty, Session, WordEntry};

fn sample_session() -> Session {
    Session::new(vec![
        WordEntry::new(
            "laconic",
            "adjective",
            "using very few words",
            "His laconic reply.",
            Difficulty::Advanced,
        ),
        WordEntry::new(
            "abate",
            "verb",
            "to lessen in intensity",
            "The storm abated.",
            Difficulty::Basic,
        ),
    ])
}

#[tokio::test]
async fn sqlite_roundtrip_persists_session_snapshot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let session = sample_session();
    let payload = codec::encode(&session).unwrap();
    repo.store(Slot::MasterSession, &payload).await.unwrap();

    let raw = repo.load(Slot::MasterSession).await.unwrap().expect("row");
    let restored: Session = codec::decode(Slot::MasterSession, &raw).unwrap();
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.unseen_len(), 2);
    assert!(repo.load(Slot::CurrentSession).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_store_all_overwrites_every_slot() {
    let storage = Storage::sqlite("sqlite:file:memdb_batch?mode=memory&cache=shared")
        .await
        .expect("storage");

    let first: Vec<(Slot, String)> = Slot::ALL.iter().map(|s| (*s, "1".to_string())).collect();
    storage.snapshots.store_all(&first).await.unwrap();
    let second: Vec<(Slot, String)> = Slot::ALL.iter().map(|s| (*s, "2".to_string())).collect();
    storage.snapshots.store_all(&second).await.unwrap();

    for slot in Slot::ALL {
        assert_eq!(
            storage.snapshots.load(slot).await.unwrap().as_deref(),
            Some("2")
        );
    }

    storage.snapshots.remove(Slot::OldSessions).await.unwrap();
    assert!(storage.snapshots.load(Slot::OldSessions).await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn sqlite_apply_batch_writes_and_removes_together() {
    let storage = Storage::sqlite("sqlite:file:memdb_apply?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.snapshots.store(Slot::CurrentSession, "\"live\"").await.unwrap();

    storage
        .snapshots
        .apply_batch(
            &[
                (Slot::MasterSession, "\"master\"".to_string()),
                (Slot::OldSessions, "[]".to_string()),
            ],
            &[Slot::CurrentSession],
        )
        .await
        .unwrap();

    assert_eq!(
        storage.snapshots.load(Slot::MasterSession).await.unwrap().as_deref(),
        Some("\"master\"")
    );
    assert_eq!(
        storage.snapshots.load(Slot::OldSessions).await.unwrap().as_deref(),
        Some("[]")
    );
    assert!(storage.snapshots.load(Slot::CurrentSession).await.unwrap().is_none());
}
