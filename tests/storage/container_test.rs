/*!
 * Container Tests
 * Lifecycle gate and child namespace
 */

use session_storage::storage::{
    Container, ContainerOptions, File, FileMode, FileOptions, FileSystem, MemContainer, MemFS,
    StorageContext, StorageError, SyncMode,
};

fn container() -> (MemContainer, StorageContext) {
    (MemContainer::new("sess-1", false), StorageContext::new())
}

#[test]
fn test_close_blocks_everything() {
    let (c, ctx) = container();
    c.close().unwrap();

    assert!(matches!(c.create(&ctx, "f"), Err(StorageError::Closed(_))));
    assert!(matches!(
        c.open_file(&ctx, "f", FileOptions::new()),
        Err(StorageError::Closed(_))
    ));
    assert!(matches!(
        c.sub_container(&ctx, "s", ContainerOptions::new()),
        Err(StorageError::Closed(_))
    ));
    assert!(matches!(c.close(), Err(StorageError::AlreadyClosed(_))));
}

#[test]
fn test_closed_check_precedes_name_check() {
    let (c, ctx) = container();
    c.create(&ctx, "f").unwrap();
    c.close().unwrap();
    assert!(matches!(c.create(&ctx, "f"), Err(StorageError::Closed(_))));
}

#[test]
fn test_duplicate_names_rejected() {
    let (c, ctx) = container();
    c.create(&ctx, "chan-0").unwrap();

    assert!(matches!(c.create(&ctx, "chan-0"), Err(StorageError::AlreadyExists(_))));
    assert!(matches!(
        c.open_file(&ctx, "chan-0", FileOptions::new()),
        Err(StorageError::AlreadyExists(_))
    ));
    assert!(matches!(
        c.sub_container(&ctx, "chan-0", ContainerOptions::new()),
        Err(StorageError::AlreadyExists(_))
    ));
}

#[test]
fn test_create_uses_append_mode() {
    let (c, ctx) = container();
    let file = c.create(&ctx, "chan-0").unwrap();
    let info = file.stat().unwrap();
    assert_eq!(info.name, "chan-0");
    assert_eq!(info.size, 0);
    assert_eq!(info.mode, FileMode::append());
}

#[test]
fn test_open_file_sync_modes() {
    let (c, ctx) = container();

    let synced = c
        .open_file(&ctx, "synced", FileOptions::new().with_close_sync_mode(SyncMode::Sync))
        .unwrap();
    assert!(!synced.stat().unwrap().mode.is_temporary());

    let scratch = c
        .open_file(&ctx, "scratch", FileOptions::new().with_close_sync_mode(SyncMode::NoSync))
        .unwrap();
    let mode = scratch.stat().unwrap().mode;
    assert!(mode.is_append());
    assert!(mode.is_temporary());

    // No different I/O path for temporary files
    scratch.write_str("tmp").unwrap();
    assert_eq!(scratch.stat().unwrap().size, 3);
}

#[test]
fn test_open_file_with_hooks() {
    let (c, ctx) = container();
    let options = FileOptions::new()
        .with_close_hook(|name: &str| -> Result<(), StorageError> {
            Err(StorageError::hook(format!("upload of {} failed", name)))
        });

    let file = c.open_file(&ctx, "chan-0", options).unwrap();
    assert!(matches!(file.close(), Err(StorageError::Hook(_))));

    // The file stays open after a failed close hook
    file.write_str("still open").unwrap();
}

#[test]
fn test_sub_container_is_independent() {
    let (c, ctx) = container();
    let sub = c
        .sub_container(&ctx, "nested", ContainerOptions::new())
        .unwrap();

    sub.create(&ctx, "inner").unwrap();
    // Child names do not leak into the parent namespace
    c.create(&ctx, "inner").unwrap();

    c.close().unwrap();
    assert!(!sub.is_closed());
    sub.create(&ctx, "after-parent-close").unwrap();
}

#[test]
fn test_sub_container_read_only_default() {
    let fs = MemFS::builder().with_read_only(true).build();
    let ctx = StorageContext::new();
    let root = fs.new_container(&ctx, "sess").unwrap();

    let writable = root
        .sub_container(&ctx, "writable", ContainerOptions::new())
        .unwrap();
    writable.create(&ctx, "f").unwrap().write(b"ok").unwrap();

    let locked = root
        .sub_container(&ctx, "locked", ContainerOptions::new().with_read_only(true))
        .unwrap();
    let f = locked.create(&ctx, "f").unwrap();
    assert!(matches!(f.write(b"no"), Err(StorageError::ReadOnly(_))));
}
