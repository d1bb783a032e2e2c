//! Concurrent mutations of one room, under both guard strategies.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use impostor_protocol::{Room, RoomStatus};
use impostor_room::{GuardStrategy, RoomError, RoomService, ServiceConfig};
use impostor_store::MemoryStore;

type Service = RoomService<Arc<MemoryStore>>;

fn service(guard: GuardStrategy) -> Arc<Service> {
    let config = ServiceConfig {
        guard,
        ..ServiceConfig::default()
    };
    Arc::new(RoomService::new(Arc::new(MemoryStore::new()), config))
}

async fn jitter() {
    for _ in 0..rand::random_range(0..4) {
        tokio::task::yield_now().await;
    }
}

/// Joins, retrying when the optimistic guard gives up under contention.
/// Safe because a join is idempotent per player id.
async fn join_with_retry(
    svc: &Service,
    token: &str,
    id: &str,
    name: &str,
) -> Result<Room, RoomError> {
    let mut attempts = 0;
    loop {
        match svc.join_room(token, id, name).await {
            Err(RoomError::StoreUnavailable(_)) if attempts < 200 => {
                attempts += 1;
                jitter().await;
            }
            other => return other,
        }
    }
}

async fn reset_with_retry(svc: &Service, token: &str) -> Result<Room, RoomError> {
    loop {
        match svc.reset_room(token).await {
            Err(RoomError::StoreUnavailable(_)) => jitter().await,
            other => return other,
        }
    }
}

async fn fill_concurrently(guard: GuardStrategy, max_players: usize, impostors: usize) {
    let svc = service(guard);
    svc.create_room("SALA1", max_players, impostors, "casa")
        .await
        .unwrap();

    let tasks = (0..max_players).map(|i| {
        let svc = Arc::clone(&svc);
        tokio::spawn(async move {
            jitter().await;
            join_with_retry(&svc, "SALA1", &format!("p{i}"), &format!("Jugador{i}")).await
        })
    });
    let responses: Vec<Room> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let room = svc.get_status("SALA1").await.unwrap();
    let ids: HashSet<_> = room.players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(room.players.len(), max_players);
    assert_eq!(ids.len(), max_players, "no duplicate roster entries");
    assert_eq!(room.status, RoomStatus::Playing);
    assert_eq!(room.impostors().count(), impostors);
    assert_eq!(room.turn_order.as_ref().map(Vec::len), Some(max_players));

    let started: Vec<_> = responses
        .iter()
        .filter(|r| r.status == RoomStatus::Playing)
        .collect();
    assert_eq!(started.len(), 1, "exactly one join deals the round");
    assert_eq!(started[0], &room, "the dealing join saw the stored roles");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lock_fill_three() {
    fill_concurrently(GuardStrategy::Lock, 3, 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lock_fill_ten() {
    fill_concurrently(GuardStrategy::Lock, 10, 3).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lock_fill_fifty() {
    fill_concurrently(GuardStrategy::Lock, 50, 25).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_optimistic_fill_three() {
    fill_concurrently(GuardStrategy::optimistic(), 3, 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_optimistic_fill_ten() {
    fill_concurrently(GuardStrategy::optimistic(), 10, 2).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_optimistic_fill_fifty() {
    fill_concurrently(GuardStrategy::optimistic(), 50, 7).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_player_joining_concurrently_is_listed_once() {
    for guard in [GuardStrategy::Lock, GuardStrategy::optimistic()] {
        let svc = service(guard);
        svc.create_room("SALA1", 5, 1, "casa").await.unwrap();

        let tasks = (0..10).map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                jitter().await;
                join_with_retry(&svc, "SALA1", "p1", "Ana").await
            })
        });
        for joined in join_all(tasks).await {
            joined.unwrap().unwrap();
        }

        let room = svc.get_status("SALA1").await.unwrap();
        assert_eq!(room.players.len(), 1, "{guard:?}");
        assert_eq!(room.status, RoomStatus::Lobby);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_have_one_winner() {
    for guard in [GuardStrategy::Lock, GuardStrategy::optimistic()] {
        let svc = service(guard);

        let tasks = (0..16).map(|i| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                jitter().await;
                svc.create_room("sala1", 3 + i, 1, "comidas").await
            })
        });
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(RoomError::AlreadyExists(_))))
            .count();
        assert_eq!(winners, 1, "{guard:?}");
        assert_eq!(losers, 15, "{guard:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resets_keep_invariants() {
    for guard in [GuardStrategy::Lock, GuardStrategy::optimistic()] {
        let svc = service(guard);
        svc.create_room("SALA1", 6, 2, "casa").await.unwrap();
        for i in 0..6 {
            svc.join_room("SALA1", &format!("p{i}"), &format!("J{i}"))
                .await
                .unwrap();
        }

        let tasks = (0..12).map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                jitter().await;
                reset_with_retry(&svc, "SALA1").await
            })
        });
        for reset in join_all(tasks).await {
            let room = reset.unwrap().unwrap();
            assert_eq!(room.impostors().count(), 2);
        }

        let room = svc.get_status("SALA1").await.unwrap();
        assert_eq!(room.players.len(), 6, "{guard:?}");
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(room.impostors().count(), 2);
        assert!(svc.catalog().contains_word(&room.config.theme, &room.secret_word));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reset_racing_joins_admits_nobody_after_the_deal() {
    for guard in [GuardStrategy::Lock, GuardStrategy::optimistic()] {
        for round in 0..20 {
            let svc = service(guard);
            svc.create_room("SALA1", 6, 1, "casa").await.unwrap();
            for i in 0..3 {
                svc.join_room("SALA1", &format!("p{i}"), &format!("J{i}"))
                    .await
                    .unwrap();
            }

            let joins: Vec<_> = (3..6)
                .map(|i| {
                    let svc = Arc::clone(&svc);
                    tokio::spawn(async move {
                        jitter().await;
                        join_with_retry(&svc, "SALA1", &format!("p{i}"), &format!("J{i}")).await
                    })
                })
                .collect();
            let reset = {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move {
                    jitter().await;
                    reset_with_retry(&svc, "SALA1").await
                })
            };

            let mut admitted = 0;
            for joined in join_all(joins).await {
                match joined.unwrap() {
                    Ok(_) => admitted += 1,
                    Err(RoomError::GameAlreadyStarted) => {}
                    Err(e) => panic!("{guard:?} round {round}: unexpected join error {e}"),
                }
            }
            let dealt = reset.await.unwrap().unwrap();
            let room = svc.get_status("SALA1").await.unwrap();

            assert_eq!(room, dealt, "{guard:?} round {round}: a write landed after the reset");
            assert_eq!(room.players.len(), 3 + admitted, "{guard:?} round {round}");
            assert_eq!(room.status, RoomStatus::Playing);
            assert_eq!(room.impostors().count(), 1);
            let order: HashSet<_> = room
                .turn_order
                .as_ref()
                .unwrap()
                .iter()
                .map(|n| n.as_str())
                .collect();
            let names: HashSet<_> = room.players.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(order, names, "{guard:?} round {round}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rooms_do_not_block_each_other() {
    let svc = service(GuardStrategy::Lock);
    let tokens: Vec<String> = (0..8).map(|i| format!("SALA{i}")).collect();
    for token in &tokens {
        svc.create_room(token, 3, 1, "casa").await.unwrap();
    }

    let mut tasks = Vec::new();
    for token in &tokens {
        for i in 0..3 {
            let svc = Arc::clone(&svc);
            let token = token.clone();
            tasks.push(tokio::spawn(async move {
                jitter().await;
                svc.join_room(&token, &format!("p{i}"), &format!("J{i}")).await
            }));
        }
    }
    for joined in join_all(tasks).await {
        joined.unwrap().unwrap();
    }

    for token in &tokens {
        let room = svc.get_status(token).await.unwrap();
        assert_eq!(room.status, RoomStatus::Playing, "{token}");
    }
    assert_eq!(svc.guard().active_locks(), 0);
}
