//! A full round through the facade: build, fill, view, reset.

use std::sync::Arc;

use impostor::prelude::*;

fn id(raw: &str) -> PlayerId {
    PlayerId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_round_views_are_redacted() {
    let service = ImpostorBuilder::new()
        .build(Arc::new(MemoryStore::new()))
        .unwrap();

    service.create_room("sala1", 4, 1, "comidas").await.unwrap();
    for (pid, name) in [("p1", "Ana"), ("p2", "Bea"), ("p3", "Cin"), ("p4", "Dan")] {
        service.join_room("SALA1", pid, name).await.unwrap();
    }
    let room = service.get_status("SALA1").await.unwrap();

    let views: Vec<PlayerView> = ["p1", "p2", "p3", "p4"]
        .iter()
        .map(|p| PlayerView::for_player(&room, &id(p), service.catalog()).unwrap())
        .collect();

    let impostors: Vec<_> = views.iter().filter(|v| v.is_impostor()).collect();
    assert_eq!(impostors.len(), 1);
    assert!(impostors[0].secret_word.is_none());
    for v in views.iter().filter(|v| !v.is_impostor()) {
        assert_eq!(v.secret_word.as_deref(), Some(room.secret_word.as_str()));
        assert_eq!(v.theme, "Comidas");
    }
    assert_eq!(views.iter().filter(|v| v.is_admin).count(), 1);
    assert!(views[0].is_admin);
}

#[tokio::test]
async fn test_errors_unify_through_question_mark() {
    async fn play(service: &RoomService<MemoryStore>) -> Result<Room, ImpostorError> {
        service.create_room("SALA2", 3, 1, "casa").await?;
        service.join_room("SALA2", "p1", "Ana").await?;
        let me = PlayerId::parse("")?;
        Ok(service.join_room("SALA2", me.as_str(), "Bea").await?)
    }

    let service = ImpostorBuilder::new().build(MemoryStore::new()).unwrap();
    let err = play(&service).await.unwrap_err();

    assert!(matches!(err, ImpostorError::Protocol(ProtocolError::InvalidInput(_))));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_reset_deals_fresh_views() {
    let service = ImpostorBuilder::new()
        .guard(GuardStrategy::optimistic())
        .build(MemoryStore::new())
        .unwrap();
    service.create_room("SALA3", 3, 1, "casa").await.unwrap();
    for (pid, name) in [("p1", "Ana"), ("p2", "Bea"), ("p3", "Cin")] {
        service.join_room("SALA3", pid, name).await.unwrap();
    }

    let room = service.reset_room("SALA3").await.unwrap();

    let seen: usize = ["p1", "p2", "p3"]
        .iter()
        .filter_map(|p| PlayerView::for_player(&room, &id(p), service.catalog()))
        .filter(|v| v.secret_word.is_some())
        .count();
    assert_eq!(seen, 2);
}
