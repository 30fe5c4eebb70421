//! Concurrency Tests
//!
//! Drives the store, the cache and the service from many OS threads at once.

use std::sync::{Arc, Barrier, OnceLock};
use std::thread;
use std::time::Duration;

use user_store::cache::TtlCache;
use user_store::domain::{Email, Password, User, UserType, MIN_HASH_COST};
use user_store::error::StoreError;
use user_store::models::{CreateUserRequest, UpdateUserRequest};
use user_store::store::{Context, ShardedStore};
use user_store::UserService;

// Hashed once; bcrypt is too slow to run per record in tight loops
fn password() -> Password {
    static PASSWORD: OnceLock<Password> = OnceLock::new();
    PASSWORD
        .get_or_init(|| Password::hash_with_cost("secret123", MIN_HASH_COST).unwrap())
        .clone()
}

fn user(email: &str, name: &str) -> User {
    User::new(
        name,
        Email::parse(email).unwrap(),
        password(),
        true,
        UserType::User,
    )
    .unwrap()
}

fn service() -> Arc<UserService> {
    Arc::new(UserService::new(
        Arc::new(ShardedStore::new(8)),
        Arc::new(TtlCache::new()),
        Duration::from_secs(30),
        Duration::from_secs(5),
    )
    .with_password_cost(MIN_HASH_COST))
}

#[test]
fn test_scenario_create_duplicate_then_get() {
    let store = ShardedStore::new(4);
    let ctx = Context::background();

    store.create(&ctx, &user("a@x.com", "R1")).unwrap();
    assert_eq!(
        store.create(&ctx, &user("a@x.com", "R2")),
        Err(StoreError::AlreadyExists)
    );

    let found = store.get_by_key(&ctx, "a@x.com").unwrap().unwrap();
    assert_eq!(found.name, "R1");
}

#[test]
fn test_sixteen_concurrent_duplicate_creates() {
    let store = Arc::new(ShardedStore::new(16));
    let barrier = Arc::new(Barrier::new(16));
    let record = user("dup@x.com", "R");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let record = record.clone();
            thread::spawn(move || {
                barrier.wait();
                store.create(&Context::background(), &record)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| **r == Err(StoreError::AlreadyExists))
            .count(),
        15
    );

    let all = store.list(&Context::background()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email.as_str(), "dup@x.com");
}

#[test]
fn test_create_delete_cycles_never_duplicate() {
    let store = Arc::new(ShardedStore::new(4));
    let keys: Vec<String> = (0..8).map(|i| format!("k{}@x.com", i)).collect();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            let keys = keys.clone();
            thread::spawn(move || {
                let ctx = Context::background();
                for i in 0..500 {
                    let key = &keys[(t + i) % keys.len()];
                    if i % 2 == 0 {
                        let _ = store.create(&ctx, &user(key, "x"));
                    } else {
                        let _ = store.delete(&ctx, key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut listed: Vec<String> = store
        .list(&Context::background())
        .unwrap()
        .into_iter()
        .map(|u| u.email.to_string())
        .collect();
    let total = listed.len();
    listed.sort();
    listed.dedup();

    assert_eq!(listed.len(), total, "a key appeared more than once");
    assert_eq!(store.len(), total);
}

#[test]
fn test_list_during_writes_sees_whole_records() {
    let store = Arc::new(ShardedStore::new(4));
    let ctx = Context::background();
    for i in 0..32 {
        store
            .create(&ctx, &user(&format!("u{}@x.com", i), "v0"))
            .unwrap();
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let ctx = Context::background();
            for round in 1..200 {
                for i in 0..32 {
                    let name = format!("v{}", round);
                    store
                        .update(&ctx, &user(&format!("u{}@x.com", i), &name))
                        .unwrap();
                }
            }
        })
    };

    for _ in 0..100 {
        let snapshot = store.list(&ctx).unwrap();
        assert_eq!(snapshot.len(), 32);
        for record in snapshot {
            assert!(record.name.starts_with('v'));
            assert_eq!(record.password, password());
        }
    }

    writer.join().unwrap();
}

#[test]
fn test_service_concurrent_readers_and_writers() {
    let svc = service();
    let ctx = Context::background();
    for i in 0..16 {
        svc.create_user(
            &ctx,
            CreateUserRequest {
                name: format!("User {}", i),
                email: format!("u{}@x.com", i),
                password: "secret123".to_string(),
                active: None,
                user_type: "User".to_string(),
            },
        )
        .unwrap();
    }

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                let ctx = Context::background();
                for i in 0..200 {
                    let email = format!("u{}@x.com", (t * 7 + i) % 16);
                    if i % 5 == 0 {
                        let req = UpdateUserRequest {
                            name: Some(format!("Renamed {}", t)),
                            ..Default::default()
                        };
                        svc.update_user(&ctx, &email, req).unwrap();
                    } else {
                        let got = svc.get_user(&ctx, &email).unwrap();
                        assert_eq!(got.email, email);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // After the writers finish, a read-through after invalidation agrees
    // with the store for every key.
    for i in 0..16 {
        let email = format!("u{}@x.com", i);
        svc.cache().invalidate(&email);
        let from_service = svc.get_user(&ctx, &email).unwrap();
        let from_store = svc.store().get_by_key(&ctx, &email).unwrap().unwrap();
        assert_eq!(from_service.name, from_store.name);
    }
}

#[test]
fn test_scenario_cache_expiry() {
    let cache = TtlCache::new();

    cache.set("k", "V".to_string(), Duration::from_millis(30));
    assert_eq!(cache.get("k"), Some("V".to_string()));

    thread::sleep(Duration::from_millis(40));

    assert_eq!(cache.get("k"), None);
}
