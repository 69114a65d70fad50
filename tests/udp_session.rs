mod support;

use arctic_server::domain::{InputState, Keys};
use arctic_server::interface_adapters::protocol::{ClientPacket, ServerPacket};
use arctic_server::use_cases::{JoinAck, WorldUpdate};
use support::TestClient;

async fn join(client: &TestClient, name: &str) -> JoinAck {
    client.send(&ClientPacket::Join { name: name.into() }).await;
    client
        .recv_until(|p| match p {
            ServerPacket::JoinAck(ack) => Some(ack),
            _ => None,
        })
        .await
        .expect("join ack")
}

async fn next_snapshot(client: &TestClient) -> (u32, WorldUpdate) {
    client
        .recv_until(|p| match p {
            ServerPacket::Snapshot { ack, update } => Some((ack, update)),
            _ => None,
        })
        .await
        .expect("snapshot")
}

#[tokio::test]
async fn join_is_acked_and_followed_by_snapshots() {
    let client = TestClient::connect().await;
    let ack = join(&client, "frost").await;
    assert_eq!(ack.bot_count, 0);

    let (_, update) = next_snapshot(&client).await;
    let me = update
        .players
        .iter()
        .find(|p| p.id == ack.player_id)
        .expect("own player in snapshot");
    // Alive on a map with spawn points.
    assert_eq!(me.state, 1);
    assert_eq!(update.pickups.len(), 8);
    assert_eq!(update.flags.len(), 2);
}

#[tokio::test]
async fn rejoin_keeps_the_same_slot() {
    let client = TestClient::connect().await;
    let first = join(&client, "twice").await;
    let second = join(&client, "twice").await;
    assert_eq!(first.player_id, second.player_id);
}

#[tokio::test]
async fn snapshot_acks_the_latest_input() {
    let client = TestClient::connect().await;
    join(&client, "mover").await;

    let input = InputState {
        keys: Keys::FORWARD,
        yaw: 0.0,
        pitch: 0.0,
    };
    client
        .send(&ClientPacket::Input {
            seq: 42,
            input,
            class: None,
        })
        .await;

    let acked = client
        .recv_until(|p| match p {
            ServerPacket::Snapshot { ack: 42, .. } => Some(()),
            _ => None,
        })
        .await;
    assert!(acked.is_some());
}

#[tokio::test]
async fn malformed_datagrams_do_not_disturb_the_server() {
    let client = TestClient::connect().await;
    client.send_raw(&[]).await;
    client.send_raw(&[0xEE, 0, 1]).await;
    client.send_raw(&[2, 1]).await;

    let ack = join(&client, "after garbage").await;
    let (_, update) = next_snapshot(&client).await;
    assert!(update.players.iter().any(|p| p.id == ack.player_id));
}

#[tokio::test]
async fn disconnect_frees_the_slot() {
    let watcher = TestClient::connect().await;
    join(&watcher, "watcher").await;

    let leaver = TestClient::connect().await;
    let ack = join(&leaver, "leaver").await;
    leaver.send(&ClientPacket::Disconnect).await;

    let gone = watcher
        .recv_until(|p| match p {
            ServerPacket::Snapshot { update, .. } if update.players.iter().all(|p| p.id != ack.player_id) => Some(()),
            _ => None,
        })
        .await;
    assert!(gone.is_some());
}
