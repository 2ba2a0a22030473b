use super::*;
use crate::profile::{Role, UserProfile};

fn store_in(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("session").join("credentials.json"))
}

#[tokio::test]
async fn missing_file_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.read().await.unwrap().is_none());
}

#[tokio::test]
async fn write_creates_parent_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let profile = UserProfile::with_role(Role::Recruiter).with_field("companyName", "Acme");
    store.write(&Credential::new("t1", profile.clone())).await.unwrap();

    // A second handle on the same path sees the value, like a page reload.
    let reopened = FileStore::new(store.path());
    let read = reopened.read().await.unwrap().unwrap();
    assert_eq!(read.token, "t1");
    assert_eq!(read.profile, profile);
}

#[tokio::test]
async fn write_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .write(&Credential::new("t1", UserProfile::with_role(Role::Talent)))
        .await
        .unwrap();
    assert!(!store.temp_path().exists());
}

#[tokio::test]
async fn malformed_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("credentials.json"));
    std::fs::write(store.path(), b"{not json").unwrap();
    assert!(matches!(store.read().await, Err(StoreError::Malformed(_))));
}

#[tokio::test]
async fn clear_removes_file_and_tolerates_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .write(&Credential::new("t1", UserProfile::with_role(Role::Admin)))
        .await
        .unwrap();
    store.clear().await.unwrap();
    assert!(!store.path().exists());
    store.clear().await.unwrap();
}

#[tokio::test]
async fn write_into_unwritable_location_keeps_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("credentials.json"));
    store
        .write(&Credential::new("old", UserProfile::with_role(Role::Admin)))
        .await
        .unwrap();

    // A directory squatting on the temp path makes the write fail.
    std::fs::create_dir(store.temp_path()).unwrap();
    let result = store
        .write(&Credential::new("new", UserProfile::with_role(Role::Talent)))
        .await;
    assert!(result.is_err());
    assert_eq!(store.read().await.unwrap().unwrap().token, "old");
}
