//! Session state machine: owns the transport, the per-session request id and
//! the receive buffer, and drives the auth and command exchanges.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

use log::{debug, trace};
use rand::Rng;

use crate::error::RconError;
use crate::packet::{self, Field, PacketType};

/// Every exchange is a single blocking read into a buffer of this size.
/// Responses longer than this are truncated, not reassembled.
pub const RECV_BUFFER_SIZE: usize = 8192;

/// The byte stream a session talks over. Anything `Read + Write` that can be
/// shut down qualifies; in practice this is a [`TcpStream`].
pub trait Transport: Read + Write {
    /// Closes both directions of the stream.
    fn close(&mut self) -> std::io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> std::io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Externally observable connection states. Authentication is atomic from the
/// caller's point of view: a session is either fully authenticated or it is
/// disconnected, there is no in-between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Authenticated,
}

/// One logical connection to one server.
///
/// The request id is drawn once per session and reused for every command; it
/// is the correlation token the auth handshake is validated against. The
/// receive buffer is zeroed between exchanges so a short response can never
/// expose bytes left over from an earlier, longer one.
pub struct Connection<T: Transport> {
    state: State,
    host: String,
    port: u16,
    request_id: i32,
    transport: Option<T>,
    buf: Box<[u8; RECV_BUFFER_SIZE]>,
}

impl<T: Transport> Connection<T> {
    pub fn new() -> Self {
        Connection {
            state: State::Disconnected,
            host: String::new(),
            port: 0,
            request_id: 0,
            transport: None,
            buf: Box::new([0; RECV_BUFFER_SIZE]),
        }
    }

    /// Authenticates over a freshly opened transport.
    ///
    /// Returns `Ok(false)` if the server rejects the password — that is an
    /// expected outcome, not a fault, and the state stays [`State::Disconnected`]
    /// so the caller is free to retry. The rejected transport is dropped and
    /// therefore closed.
    pub fn handshake(
        &mut self,
        mut transport: T,
        host: &str,
        port: u16,
        password: &str,
    ) -> Result<bool, RconError> {
        if self.state == State::Authenticated {
            return Err(RconError::AlreadyConnected);
        }

        // One id for the life of the session. Uniqueness within a single
        // handshake round-trip is all that matters, so a weak source is fine.
        let request_id = rand::thread_rng().gen_range(0..i32::MAX);
        let login = packet::encode(request_id, PacketType::Auth, password)?;

        trace!("sending auth packet with request id {request_id}");
        transport.write_all(&login)?;

        self.buf.fill(0);
        let n = transport.read(&mut self.buf[..])?;
        let echoed = packet::decode(&self.buf[..n], Field::RequestId)?;

        // The server echoes our id on success and -1 on a bad password.
        // Compared byte for byte, exactly as it arrived.
        if echoed != request_id.to_le_bytes().as_slice() {
            debug!("server rejected auth for {host}:{port}");
            self.buf.fill(0);
            return Ok(false);
        }

        trace!("auth complete for {host}:{port}");
        self.state = State::Authenticated;
        self.host = host.to_string();
        self.port = port;
        self.request_id = request_id;
        self.transport = Some(transport);
        self.buf.fill(0);
        Ok(true)
    }

    /// Sends one command and blocks for one response read.
    pub fn send_command(&mut self, payload: &str) -> Result<String, RconError> {
        if self.state != State::Authenticated {
            return Err(RconError::NotConnected);
        }
        let packet = packet::encode(self.request_id, PacketType::Command, payload)?;
        let transport = self.transport.as_mut().ok_or(RconError::NotConnected)?;

        trace!("sending command packet ({} bytes)", packet.len());
        transport.write_all(&packet)?;

        self.buf.fill(0);
        let n = transport.read(&mut self.buf[..])?;
        let body = packet::decode(&self.buf[..n], Field::Payload)?;
        let text = packet::bytes_to_ascii(body);
        self.buf.fill(0);

        trace!("received {} bytes of response text", text.len());
        Ok(text)
    }

    /// Closes the transport and resets the session. A second call fails with
    /// [`RconError::NotConnected`] rather than being silently accepted.
    pub fn disconnect(&mut self) -> Result<(), RconError> {
        if self.state != State::Authenticated {
            return Err(RconError::NotConnected);
        }
        let closed = match self.transport.take() {
            Some(mut transport) => transport.close(),
            None => Ok(()),
        };

        // The session is reset even if the close failed; a half-dead
        // transport is not worth keeping around.
        self.state = State::Disconnected;
        self.host.clear();
        self.port = 0;
        self.buf.fill(0);

        trace!("disconnected");
        closed.map_err(RconError::Io)
    }

    pub fn is_connected(&self) -> bool {
        self.state == State::Authenticated
    }

    /// Host of the current connection, empty when disconnected.
    pub fn address(&self) -> &str {
        &self.host
    }

    /// Port of the current connection, 0 when disconnected.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl<T: Transport> Default for Connection<T> {
    fn default() -> Self {
        Self::new()
    }
}
