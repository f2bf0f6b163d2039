use thiserror::Error;

/// Possible errors for the crate.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned if the host is down, behind a firewall or refusing
    /// connections.
    #[error("unable to connect to the server")]
    ConnectionFailed(#[source] std::io::Error),
    /// Returned if `connect` is called while a session is already
    /// authenticated. Disconnect first.
    #[error("already connected to a server")]
    AlreadyConnected,
    /// Returned if an operation that needs an authenticated session is
    /// attempted while disconnected.
    #[error("not connected to any server")]
    NotConnected,
    /// Returned if an outgoing payload cannot be framed into a valid packet.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),
    /// Returned if a received byte sequence is too short to carry the fixed
    /// 12-byte header.
    #[error("received packet is malformed")]
    InvalidPacket,
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from or writing to the socket.
    #[error("socket failure on an established connection")]
    Io(#[from] std::io::Error),
}

/// Reasons an outgoing payload gets rejected before anything touches the
/// wire.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// The rcon protocol only carries 7-bit ascii.
    #[error("payload is not pure ascii")]
    NotAscii,
    /// The framed packet would meet or exceed the protocol's size ceiling.
    #[error("payload too long ({size} >= {max} bytes framed)")]
    TooLong { size: usize, max: usize },
}
