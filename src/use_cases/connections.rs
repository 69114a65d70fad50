// Connection table: datagram source address to player slot.

use crate::domain::{Handle, Player};
use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy)]
pub struct Connection {
    pub player: Handle<Player>,
    /// Highest input sequence applied so far.
    pub last_seq: u32,
    /// Seconds since the last packet from this address.
    pub idle: f32,
}

#[derive(Debug, Default)]
pub struct Connections {
    by_addr: HashMap<SocketAddr, Connection>,
}

impl Connections {
    pub fn len(&self) -> usize {
        self.by_addr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_addr.is_empty()
    }

    pub fn get(&self, addr: &SocketAddr) -> Option<&Connection> {
        self.by_addr.get(addr)
    }

    pub fn get_mut(&mut self, addr: &SocketAddr) -> Option<&mut Connection> {
        self.by_addr.get_mut(addr)
    }

    pub fn insert(&mut self, addr: SocketAddr, player: Handle<Player>) {
        self.by_addr.insert(
            addr,
            Connection {
                player,
                last_seq: 0,
                idle: 0.0,
            },
        );
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Connection> {
        self.by_addr.remove(addr)
    }

    /// Ages every connection and removes those idle past `timeout`.
    pub fn expire(&mut self, dt: f32, timeout: f32) -> Vec<(SocketAddr, Connection)> {
        let mut expired = Vec::new();
        self.by_addr.retain(|addr, conn| {
            conn.idle += dt;
            if conn.idle > timeout {
                expired.push((*addr, *conn));
                false
            } else {
                true
            }
        });
        expired
    }

    /// Addresses with their acked sequence, ordered by player slot.
    pub fn recipients(&self) -> Vec<(SocketAddr, u32)> {
        let mut list: Vec<(usize, SocketAddr, u32)> = self
            .by_addr
            .iter()
            .map(|(addr, c)| (c.player.index(), *addr, c.last_seq))
            .collect();
        list.sort_by_key(|(slot, _, _)| *slot);
        list.into_iter().map(|(_, addr, seq)| (addr, seq)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityStore;

    #[test]
    fn idle_connections_expire_after_timeout() {
        let mut players = EntityStore::with_capacity(2);
        let h = players.insert(Player::new("a".into(), 0, false)).unwrap();
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let mut conns = Connections::default();
        conns.insert(addr, h);

        assert!(conns.expire(5.0, 10.0).is_empty());
        conns.get_mut(&addr).unwrap().idle = 0.0;
        assert!(conns.expire(9.5, 10.0).is_empty());
        let gone = conns.expire(1.0, 10.0);
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].1.player, h);
        assert!(conns.is_empty());
    }
}
