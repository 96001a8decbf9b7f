//! Basic example demonstrating the Nakama Rust client.
//!
//! This example shows how to:
//! 1. Authenticate with a device ID
//! 2. Read and write storage objects
//! 3. Submit a leaderboard score and call an RPC
//!
//! Point it at a server with `NAKAMA_HOST`, `NAKAMA_PORT` and friends.

use nakama_rs::{
    LeaderboardRecordWrite, NakamaClientBuilder, ReadStorageObjectId, Result, WriteStorageObject,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SaveGame {
    level: u32,
    coins: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Nakama Rust Client Example ===\n");

    let client = NakamaClientBuilder::from_env()?.build()?;
    client.healthcheck().await?;
    println!("Server at {} is healthy", client.base_url());

    // ========================================================================
    // Part 1: Authentication
    // ========================================================================
    println!("\n1. Authenticating with device ID...");

    let session = client
        .authenticate_device("rust-client-example-device", true, None)
        .await?;
    println!("   Logged in as: {}", session);

    // ========================================================================
    // Part 2: Storage
    // ========================================================================
    println!("\n2. Saving game state...");

    let save = SaveGame {
        level: 7,
        coins: 1200,
    };
    let acks = client
        .write_storage_objects(
            &session,
            &[WriteStorageObject::json("saves", "slot1", &save)?],
        )
        .await?;
    for ack in &acks.acks {
        println!("   Stored {}/{} at version {}", ack.collection, ack.key, ack.version);
    }

    let read = client
        .read_storage_objects(
            &session,
            &[ReadStorageObjectId {
                collection: "saves".into(),
                key: "slot1".into(),
                user_id: Some(session.user_id.clone()),
            }],
        )
        .await?;
    if let Some(object) = read.objects.first() {
        let loaded: SaveGame = object.value_as()?;
        println!("   Loaded: {:?}", loaded);
    }

    // ========================================================================
    // Part 3: Leaderboard and RPC
    // ========================================================================
    println!("\n3. Submitting score...");

    let record = LeaderboardRecordWrite {
        score: 4200,
        ..Default::default()
    };
    match client.write_leaderboard_record(&session, "weekly", &record).await {
        Ok(record) => println!("   Rank {} with score {}", record.rank, record.score),
        Err(e) if e.is_not_found() => println!("   Leaderboard 'weekly' does not exist"),
        Err(e) => return Err(e),
    }

    match client.rpc(&session, "echo", Some(r#"{"hello":"world"}"#)).await {
        Ok(rpc) => println!("   RPC echo returned: {}", rpc.payload),
        Err(e) if e.is_not_found() => println!("   No 'echo' RPC registered"),
        Err(e) => return Err(e),
    }

    client.session_logout(&session).await?;
    println!("\n=== Example Complete ===");
    Ok(())
}
