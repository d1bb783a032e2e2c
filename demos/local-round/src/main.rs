use std::sync::Arc;

use impostor::prelude::*;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const TOKEN: &str = "sala1";
const SEATS: [(&str, &str); 4] = [("p1", "Ana"), ("p2", "Bea"), ("p3", "Cin"), ("p4", "Dan")];

/// Prints what each seat's client would render.
fn show(room: &Room, catalog: &ThemeCatalog) -> Result<(), Box<dyn std::error::Error>> {
    for (pid, _) in SEATS {
        let id = PlayerId::parse(pid)?;
        if let Some(view) = PlayerView::for_player(room, &id, catalog) {
            println!("{pid}: {}", serde_json::to_string(&view)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let service = Arc::new(
        ImpostorBuilder::new()
            .theme("animales", "Animales", ["Perro", "Gato", "Loro", "Vaca"])
            .build(MemoryStore::new())?,
    );

    let token = service.create_room(TOKEN, SEATS.len(), 1, "animales").await?;
    println!("room {token} open, waiting for {} players", SEATS.len());

    // Everyone joins at once; exactly one of them deals the round.
    let joins: Vec<_> = SEATS
        .iter()
        .map(|&(pid, name)| {
            let service = Arc::clone(&service);
            let token = token.clone();
            tokio::spawn(async move { service.join_room(token.as_str(), pid, name).await })
        })
        .collect();
    for join in joins {
        join.await??;
    }

    let room = service.get_status(token.as_str()).await?;
    println!("round 1 ({})", room.status);
    show(&room, service.catalog())?;

    let room = service.reset_room(token.as_str()).await?;
    println!("round 2 ({})", room.status);
    show(&room, service.catalog())?;

    match service.join_room(token.as_str(), "p5", "Eva").await {
        Err(e) => println!("late joiner refused: {e}"),
        Ok(_) => tracing::warn!("late joiner was admitted"),
    }

    Ok(())
}
