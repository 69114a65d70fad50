// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use std::{
    // `SocketAddr` is the UDP endpoint every test sends datagrams to.
    net::SocketAddr,
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

use arctic_server::interface_adapters::protocol::{ClientPacket, ServerPacket};
use arctic_server::use_cases::SimSettings;
use bytes::BytesMut;
use tokio::net::UdpSocket;

// Global server address used by all tests after the server publishes it.
static SERVER_ADDR: OnceLock<SocketAddr> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return its shared address.
pub fn ensure_server() -> SocketAddr {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the server thread publishes its bound address.
        let published_addr = Arc::new(OnceLock::<SocketAddr>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_addr_thread = Arc::clone(&published_addr);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // Each server thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            // Run async server startup and serving on this dedicated runtime.
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let socket = UdpSocket::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the exact address that was assigned by the OS.
                let addr = socket.local_addr().expect("get local addr");
                // Publish the address so test code can target the right server.
                let _ = published_addr_thread.set(addr);
                // No bots and a fixed seed keep snapshots small and runs repeatable.
                let settings = SimSettings {
                    seed: Some(7),
                    ..arctic_server::sim_settings(0)
                };
                // Serve until the test process exits.
                arctic_server::run(socket, settings).await.expect("server failed");
            });
        });
        // Block until the address is published.
        wait_for_server_addr(published_addr);
    });

    // Return the stable shared address used by all tests in this binary.
    *SERVER_ADDR.get().expect("server addr should be initialized")
}

// Wait for address publication; a UDP socket is ready as soon as it is bound.
fn wait_for_server_addr(published_addr: Arc<OnceLock<SocketAddr>>) {
    // Poll until the server thread publishes the address.
    for _ in 0..500 {
        // If the address is published, persist it globally and stop waiting.
        if let Some(addr) = published_addr.get() {
            let _ = SERVER_ADDR.set(*addr);
            return;
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    }

    // Fail fast if startup never published an address.
    panic!("server did not become ready in time");
}

// A client socket bound to its own ephemeral port, so each test is a distinct connection.
pub struct TestClient {
    pub socket: UdpSocket,
    pub server: SocketAddr,
}

impl TestClient {
    // Bind a fresh client socket against the shared server.
    pub async fn connect() -> Self {
        let server = ensure_server();
        let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind client");
        Self { socket, server }
    }

    // Encode and send one client packet.
    pub async fn send(&self, packet: &ClientPacket) {
        let mut buf = BytesMut::new();
        packet.encode(&mut buf);
        self.send_raw(&buf).await;
    }

    // Send arbitrary bytes, including malformed datagrams.
    pub async fn send_raw(&self, bytes: &[u8]) {
        self.socket.send_to(bytes, self.server).await.expect("send datagram");
    }

    // Receive server packets until `pick` accepts one or the timeout elapses.
    pub async fn recv_until<T>(&self, mut pick: impl FnMut(ServerPacket) -> Option<T>) -> Option<T> {
        let mut buf = vec![0u8; 65_536];
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        loop {
            // Bound each wait by whatever time is left.
            let recv = tokio::time::timeout_at(deadline, self.socket.recv_from(&mut buf)).await;
            let Ok(Ok((len, _))) = recv else {
                return None;
            };
            // Undecodable datagrams would be a server bug; skip rather than panic here.
            if let Ok(packet) = ServerPacket::decode(&buf[..len]) {
                if let Some(found) = pick(packet) {
                    return Some(found);
                }
            }
        }
    }
}
