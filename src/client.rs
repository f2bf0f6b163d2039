use std::net::TcpStream;

use log::trace;

use crate::connection::Connection;
use crate::error::RconError;

/// Simple synchronous rcon client. Call `connect()` to establish a connection
/// and authenticate, then `send()` to run commands. The client should be
/// `mut` as every exchange reuses the session's receive buffer.
///
/// Every operation blocks the calling thread until the server answers; there
/// is no timeout at this layer, so a stalled server stalls the caller.
///
/// ## Example
/// ```no_run
/// use craftcon::client::Client;
/// use std::error::Error;
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let mut client = Client::new();
///     if client.connect("localhost", 25575, "<put rcon password here>")? {
///         let response = client.send("list")?;
///         println!("{response}");
///         client.disconnect()?;
///     }
///     Ok(())
/// }
/// ```
pub struct Client {
    connection: Connection<TcpStream>,
}

impl Client {
    pub fn new() -> Self {
        Client {
            connection: Connection::new(),
        }
    }

    /// Opens a TCP connection and authenticates with `password`.
    ///
    /// Returns `Ok(false)` if the server rejects the password; the client
    /// stays disconnected and `connect` may simply be called again. An
    /// unreachable host is a [`RconError::ConnectionFailed`] error, and
    /// connecting while already connected is [`RconError::AlreadyConnected`].
    pub fn connect(&mut self, host: &str, port: u16, password: &str) -> Result<bool, RconError> {
        if self.connection.is_connected() {
            return Err(RconError::AlreadyConnected);
        }
        let stream = TcpStream::connect((host, port)).map_err(RconError::ConnectionFailed)?;
        trace!("opened tcp stream to {host}:{port}, attempting auth");
        self.connection.handshake(stream, host, port, password)
    }

    /// Runs a command and returns the server's response text.
    pub fn send(&mut self, command: &str) -> Result<String, RconError> {
        self.connection.send_command(command)
    }

    /// Closes the connection. Fails with [`RconError::NotConnected`] if there
    /// is nothing to close.
    pub fn disconnect(&mut self) -> Result<(), RconError> {
        self.connection.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Host of the current connection, empty when disconnected.
    pub fn address(&self) -> &str {
        self.connection.address()
    }

    /// Port of the current connection, 0 when disconnected.
    pub fn port(&self) -> u16 {
        self.connection.port()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
