use crate::prelude::{ScopeError, ScopeResult};
use crate::wire::codec::encode_into;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Ships float slices to a scope as single little-endian datagrams.
pub struct ScopeSender {
    socket: UdpSocket,
    destination: SocketAddr,
    scratch: Vec<u8>,
}

impl ScopeSender {
    /// Binds an ephemeral local port and resolves `destination` once.
    pub fn new<A: ToSocketAddrs>(destination: A) -> ScopeResult<Self> {
        let destination = destination.to_socket_addrs()?.next().ok_or_else(|| {
            ScopeError::InvalidConfig("destination resolved to no address".into())
        })?;
        let local = if destination.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local).map_err(|source| ScopeError::Bind {
            addr: local.to_string(),
            source,
        })?;
        Ok(Self {
            socket,
            destination,
            scratch: Vec::new(),
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn send_wave(&mut self, samples: &[f32]) -> ScopeResult<usize> {
        self.scratch.clear();
        encode_into(samples, &mut self.scratch);
        let sent = self.socket.send_to(&self.scratch, self.destination)?;
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::FrameCodec;
    use std::time::Duration;

    #[test]
    fn send_wave_emits_one_datagram() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let mut sender = ScopeSender::new(listener.local_addr().unwrap()).unwrap();

        let sent = sender.send_wave(&[0.0, 70.5, -1.25, 8.0]).unwrap();
        assert_eq!(sent, 16);

        let mut buf = [0u8; 64];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let frame = FrameCodec::default().decode(&buf[..len]).unwrap();
        assert_eq!(frame.as_slice(), &[0.0, 70.5, -1.25, 8.0]);
    }
}
