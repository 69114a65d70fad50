use crate::interface_adapters::protocol::{self, ClientPacket, DecodeError, NAME_LEN, ServerPacket};
use crate::use_cases::{GameEvent, TickOutput};

use bytes::BytesMut;
use std::{
    io,
    net::SocketAddr,
    time::{Duration, Instant},
};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

#[derive(Debug)]
enum NetError {
    // Send-side failures; the caller decides whether to log or drop.
    WouldBlock,
    Io(io::Error),
}

impl From<io::Error> for NetError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::WouldBlock {
            NetError::WouldBlock
        } else {
            NetError::Io(e)
        }
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
// Upper bound per drain so a flood cannot starve the tick.
const MAX_DATAGRAMS_PER_DRAIN: usize = 4096;
const DEFAULT_NAME: &str = "Player";

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// Strips control characters and clips to the wire name field.
fn sanitize_name(name: &str) -> String {
    let mut clean = String::with_capacity(NAME_LEN);
    for c in name.trim().chars().filter(|c| !c.is_control()) {
        if clean.len() + c.len_utf8() > NAME_LEN - 1 {
            break;
        }
        clean.push(c);
    }
    if clean.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        clean
    }
}

/// Non-blocking UDP front end for the tick loop.
pub struct UdpEndpoint {
    socket: UdpSocket,
    recv_buf: Vec<u8>,
    send_buf: BytesMut,
    last_malformed_log: Instant,
    last_invalid_input_log: Instant,
    last_send_full_log: Instant,
    last_send_error_log: Instant,
}

impl UdpEndpoint {
    pub fn new(socket: UdpSocket, recv_buffer_size: usize) -> Self {
        // Backdate so the first occurrence of each warning is logged.
        let now = Instant::now().checked_sub(LOG_THROTTLE).unwrap_or_else(Instant::now);
        Self {
            socket,
            recv_buf: vec![0; recv_buffer_size],
            send_buf: BytesMut::with_capacity(recv_buffer_size),
            last_malformed_log: now,
            last_invalid_input_log: now,
            last_send_full_log: now,
            last_send_error_log: now,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Reads every queued datagram without blocking and decodes it.
    /// Malformed packets are dropped.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..MAX_DATAGRAMS_PER_DRAIN {
            let (len, addr) = match self.socket.try_recv_from(&mut self.recv_buf) {
                Ok(received) => received,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                // ICMP port-unreachable from a departed client surfaces here on some platforms.
                Err(e) => {
                    if should_log(&mut self.last_send_error_log) {
                        debug!(error = %e, "recv failed");
                    }
                    continue;
                }
            };

            match ClientPacket::decode(&self.recv_buf[..len]) {
                Ok(packet) => {
                    if let Some(event) = self.event_for(addr, packet) {
                        events.push(event);
                    }
                }
                Err(e) => self.log_malformed(addr, len, &e),
            }
        }
        events
    }

    fn event_for(&mut self, addr: SocketAddr, packet: ClientPacket) -> Option<GameEvent> {
        match packet {
            ClientPacket::Join { name } => Some(GameEvent::Join {
                addr,
                name: sanitize_name(&name),
            }),
            ClientPacket::Input { seq, input, class } => {
                // Still forwarded: the packet keeps the connection alive and
                // the simulation refuses to apply it.
                if !input.is_finite() && should_log(&mut self.last_invalid_input_log) {
                    warn!(%addr, seq, "invalid input values (NaN/inf)");
                }
                Some(GameEvent::Input {
                    addr,
                    seq,
                    input,
                    class,
                })
            }
            ClientPacket::Disconnect => Some(GameEvent::Leave { addr }),
        }
    }

    fn log_malformed(&mut self, addr: SocketAddr, len: usize, error: &DecodeError) {
        if should_log(&mut self.last_malformed_log) {
            debug!(%addr, len, ?error, "malformed datagram dropped");
        }
    }

    /// Sends join acks to their requesters, then events and the snapshot to
    /// every connection. The snapshot is encoded once; only the acked
    /// sequence differs per recipient.
    pub fn broadcast(&mut self, output: &TickOutput) {
        let mut buf = std::mem::take(&mut self.send_buf);

        for (addr, ack) in &output.acks {
            buf.clear();
            ServerPacket::JoinAck(*ack).encode(&mut buf);
            self.send(&buf, *addr);
        }

        for event in &output.events {
            buf.clear();
            ServerPacket::from(*event).encode(&mut buf);
            for (addr, _) in &output.recipients {
                self.send(&buf, *addr);
            }
        }

        if !output.recipients.is_empty() {
            buf.clear();
            protocol::encode_snapshot(&output.update, 0, &mut buf);
            for (addr, ack) in &output.recipients {
                protocol::patch_ack(&mut buf, *ack);
                self.send(&buf, *addr);
            }
        }

        self.send_buf = buf;
    }

    fn send(&mut self, bytes: &[u8], addr: SocketAddr) {
        let result = self.socket.try_send_to(bytes, addr).map_err(NetError::from);
        match result {
            Ok(_) => {}
            Err(NetError::WouldBlock) => {
                if should_log(&mut self.last_send_full_log) {
                    warn!(%addr, "socket send buffer full; dropping datagram");
                }
            }
            Err(NetError::Io(e)) => {
                if should_log(&mut self.last_send_error_log) {
                    debug!(%addr, error = %e, "send failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputState, Keys};

    #[test]
    fn names_are_cleaned_and_clipped() {
        assert_eq!(sanitize_name("  bob\u{7}  "), "bob");
        assert_eq!(sanitize_name("\n\t"), DEFAULT_NAME);
        assert_eq!(sanitize_name(&"é".repeat(20)).len(), 30);
    }

    #[tokio::test]
    async fn drain_decodes_and_skips_garbage() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();
        let mut endpoint = UdpEndpoint::new(server, 2048);
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut buf = BytesMut::new();
        ClientPacket::Join { name: "ann".into() }.encode(&mut buf);
        client.send_to(&buf, server_addr).await.unwrap();
        client.send_to(&[0xEE, 1, 2], server_addr).await.unwrap();
        buf.clear();
        ClientPacket::Input {
            seq: 1,
            input: InputState {
                keys: Keys::FORWARD,
                yaw: f32::NAN,
                pitch: 0.0,
            },
            class: None,
        }
        .encode(&mut buf);
        client.send_to(&buf, server_addr).await.unwrap();
        client.send_to(&[protocol::kind::DISCONNECT], server_addr).await.unwrap();

        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(endpoint.drain());
            if events.len() >= 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], GameEvent::Join { name, .. } if name == "ann"));
        // Non-finite input is passed on so it still counts as traffic.
        assert!(matches!(events[1], GameEvent::Input { seq: 1, .. }));
        assert!(matches!(events[2], GameEvent::Leave { .. }));
    }
}
