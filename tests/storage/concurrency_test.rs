/*!
 * Concurrency Tests
 * Races on names, shared readers and independent lock domains
 */

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use session_storage::storage::{
    Container, ContainerOptions, File, FileMode, FileSystem, MemContainer, MemFS, MemFile,
    StorageContext, StorageError,
};

const THREADS: usize = 8;

#[test]
fn test_racing_creates_single_winner() {
    let container = Arc::new(MemContainer::new("sess-1", false));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let ctx = StorageContext::new();
                barrier.wait();
                // Half the threads race with files, half with sub-containers
                if i % 2 == 0 {
                    container.create(&ctx, "contested").map(|_| ())
                } else {
                    container
                        .sub_container(&ctx, "contested", ContainerOptions::new())
                        .map(|_| ())
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, StorageError::AlreadyExists(_))));
    assert_eq!(container.child_names(), vec!["contested".to_string()]);
}

#[test]
fn test_close_races_with_creates() {
    let container = Arc::new(MemContainer::new("sess-1", false));
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let creators: Vec<_> = (0..THREADS)
        .map(|t| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let ctx = StorageContext::new();
                barrier.wait();
                let mut outcomes = Vec::new();
                for i in 0..200 {
                    let name = format!("{}-{}", t, i);
                    let result = if i % 2 == 0 {
                        container.create(&ctx, &name).map(|_| ())
                    } else {
                        container
                            .sub_container(&ctx, &name, ContainerOptions::new())
                            .map(|_| ())
                    };
                    outcomes.push(result);
                }
                outcomes
            })
        })
        .collect();

    let closer = {
        let container = container.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            container.close()
        })
    };

    closer.join().unwrap().unwrap();
    let mut successes = 0;
    for h in creators {
        let outcomes = h.join().unwrap();
        // Once a creator observes the close, it never succeeds again
        let first_closed = outcomes
            .iter()
            .position(|r| r.is_err())
            .unwrap_or(outcomes.len());
        assert!(outcomes[first_closed..]
            .iter()
            .all(|r| matches!(r, Err(StorageError::Closed(_)))));
        successes += first_closed;
    }

    assert!(container.is_closed());
    assert_eq!(container.child_names().len(), successes);
    assert!(matches!(
        container.create(&StorageContext::new(), "late"),
        Err(StorageError::Closed(_))
    ));
}

#[test]
fn test_racing_root_new_single_winner() {
    let fs = Arc::new(MemFS::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = fs.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                fs.new_container(&StorageContext::new(), "sess-1").is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn test_distinct_names_all_commit() {
    let container = Arc::new(MemContainer::new("sess-1", false));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let container = container.clone();
            thread::spawn(move || {
                container
                    .create(&StorageContext::new(), &format!("chan-{}", i))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let names: HashSet<String> = container.child_names().into_iter().collect();
    assert_eq!(names.len(), THREADS);
}

#[test]
fn test_concurrent_readers_partition_content() {
    let file = Arc::new(MemFile::new("chan-0", FileMode::append()));
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    file.write(&payload).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let file = file.clone();
            thread::spawn(move || {
                let mut buf = [0u8; 97];
                let mut total = 0;
                loop {
                    let n = file.read(&mut buf).unwrap();
                    if n == 0 {
                        return total;
                    }
                    total += n;
                }
            })
        })
        .collect();

    // Every byte is handed to exactly one reader
    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, payload.len());
    assert!(file.is_empty());
}

#[test]
fn test_concurrent_writers_keep_every_byte() {
    let file = Arc::new(MemFile::new("chan-0", FileMode::append()));
    let per_thread = 100;

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let file = file.clone();
            thread::spawn(move || {
                let frame = [i as u8; 16];
                for _ in 0..per_thread {
                    file.write(&frame).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        file.stat().unwrap().size as usize,
        THREADS * per_thread * 16
    );

    // Writes are never interleaved inside a frame
    let mut buf = [0u8; 16];
    while file.read(&mut buf).unwrap() == 16 {
        assert!(buf.iter().all(|b| *b == buf[0]));
    }
}

#[test]
fn test_parent_and_child_locks_are_independent() {
    let fs = MemFS::new();
    let ctx = StorageContext::new();
    fs.new_container(&ctx, "sess-1").unwrap();
    let parent = fs.mem_container("sess-1").unwrap();
    parent
        .sub_container(&ctx, "child", ContainerOptions::new())
        .unwrap();
    let child = parent.mem_sub_container("child").unwrap();
    parent.create(&ctx, "chan-0").unwrap();
    let file = parent.mem_file("chan-0").unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                child
                    .create(&StorageContext::new(), &format!("c-{}", i))
                    .unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                file.write(b"x").unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..200 {
                parent
                    .create(&StorageContext::new(), &format!("p-{}", i))
                    .unwrap();
            }
        });
    });

    assert_eq!(child.child_names().len(), 200);
    assert_eq!(parent.child_names().len(), 202);
    assert_eq!(file.len(), 200);
}
