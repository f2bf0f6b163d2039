//! Wire codec for the rcon framing: pure byte-sequence assembly and field
//! extraction, no I/O and no state.

use crate::error::{PayloadError, RconError};

/// Total framed size must stay strictly below this, or Minecraft's rcon
/// listener drops the connection.
pub const MAX_PACKET_SIZE: usize = 1446;

/// Body length, request id and request type, four little-endian bytes each.
pub const HEADER_SIZE: usize = 12;

// The declared body length counts everything after itself: id (4), type (4)
// and the two null terminators.
const BASE_PACKET_SIZE: usize = 10;

// Header plus terminators, the framing overhead on top of the payload.
const FRAME_OVERHEAD: usize = 14;

pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND
    Command,
    // SERVERDATA_RESPONSE_VALUE
    Response,
}

impl PacketType {
    pub fn to_le_bytes(&self) -> [u8; 4] {
        let type_value: i32 = match self {
            PacketType::Auth => 3,
            PacketType::Command => 2,
            PacketType::Response => 0,
        };
        type_value.to_le_bytes()
    }
}

/// Selects which field [`decode`] pulls out of a received buffer.
#[derive(Clone, Copy, Debug)]
pub enum Field {
    RequestId,
    RequestType,
    Payload,
}

/// Frames `payload` into a complete rcon packet.
///
/// The payload has to be pure ascii and short enough that the framed packet
/// stays under [`MAX_PACKET_SIZE`]; anything else is rejected with
/// [`RconError::InvalidPayload`] before a single byte is written anywhere.
pub fn encode(request_id: i32, packet_type: PacketType, payload: &str) -> Result<Vec<u8>, RconError> {
    if !payload.is_ascii() {
        return Err(PayloadError::NotAscii.into());
    }
    let total = payload.len() + FRAME_OVERHEAD;
    if total >= MAX_PACKET_SIZE {
        return Err(PayloadError::TooLong {
            size: total,
            max: MAX_PACKET_SIZE,
        }
        .into());
    }

    // Size, ID, Type, Body, Terminator
    let body_length = (payload.len() + BASE_PACKET_SIZE) as i32;
    let mut data = Vec::with_capacity(total);
    data.extend_from_slice(&body_length.to_le_bytes());
    data.extend_from_slice(&request_id.to_le_bytes());
    data.extend_from_slice(&packet_type.to_le_bytes());
    data.extend_from_slice(payload.as_bytes());
    // null terminate the body, then null terminate the entire packet
    data.extend_from_slice(&[0, 0]);
    Ok(data)
}

/// Extracts one field of a received packet by its fixed offset.
///
/// Fails with [`RconError::InvalidPacket`] if the buffer cannot even hold the
/// 12-byte header. The payload runs from byte 12 to the first null byte: the
/// receive buffer is reused between reads, so reading up to the declared
/// length would hand back stale garbage after a short response.
pub fn decode(buf: &[u8], field: Field) -> Result<&[u8], RconError> {
    if buf.len() < HEADER_SIZE {
        return Err(RconError::InvalidPacket);
    }
    match field {
        Field::RequestId => Ok(&buf[4..8]),
        Field::RequestType => Ok(&buf[8..12]),
        Field::Payload => {
            let body = &buf[HEADER_SIZE..];
            let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
            Ok(&body[..end])
        }
    }
}

/// Best-effort conversion of raw payload bytes to text: printable ascii and
/// ordinary whitespace survive, everything else is dropped. Never fails.
pub fn bytes_to_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| b.is_ascii_graphic() || matches!(b, b' ' | b'\n' | b'\t'))
        .map(|&b| b as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_lays_out_an_auth_packet() {
        let data = encode(1, PacketType::Auth, "secret").unwrap();

        assert_eq!(data.len(), 20);
        assert_eq!(&data[0..4], &16i32.to_le_bytes());
        assert_eq!(&data[4..8], &1i32.to_le_bytes());
        assert_eq!(&data[8..12], &3i32.to_le_bytes());
        assert_eq!(&data[12..18], b"secret");
        assert_eq!(&data[18..20], &[0, 0]);
    }

    #[test]
    fn decode_recovers_every_field() {
        let data = encode(77, PacketType::Command, "say hi").unwrap();

        assert_eq!(decode(&data, Field::RequestId).unwrap(), &77i32.to_le_bytes());
        assert_eq!(decode(&data, Field::RequestType).unwrap(), &2i32.to_le_bytes());
        assert_eq!(decode(&data, Field::Payload).unwrap(), b"say hi");
    }

    #[test]
    fn encode_rejects_non_ascii_payloads() {
        let err = encode(1, PacketType::Command, "weiß nicht").unwrap_err();
        assert!(matches!(
            err,
            RconError::InvalidPayload(PayloadError::NotAscii)
        ));
    }

    #[test]
    fn encode_rejects_oversize_payloads() {
        let long = "a".repeat(MAX_PACKET_SIZE);
        let err = encode(1, PacketType::Command, &long).unwrap_err();
        assert!(matches!(
            err,
            RconError::InvalidPayload(PayloadError::TooLong { .. })
        ));

        // 1431 payload bytes frame to exactly 1445, the largest legal packet
        let edge = "a".repeat(MAX_PACKET_SIZE - FRAME_OVERHEAD - 1);
        assert!(encode(1, PacketType::Command, &edge).is_ok());
        let over = "a".repeat(MAX_PACKET_SIZE - FRAME_OVERHEAD);
        assert!(encode(1, PacketType::Command, &over).is_err());
    }

    #[test]
    fn decode_rejects_buffers_shorter_than_the_header() {
        let short = [0u8; 10];
        assert!(matches!(
            decode(&short, Field::Payload).unwrap_err(),
            RconError::InvalidPacket
        ));
    }

    #[test]
    fn payload_extraction_stops_at_the_first_null() {
        // simulate a reused 32-byte receive buffer with stale bytes after the
        // terminator
        let mut buf = [b'x'; 32];
        let packet = encode(5, PacketType::Response, "done").unwrap();
        buf[..packet.len()].copy_from_slice(&packet);

        assert_eq!(decode(&buf, Field::Payload).unwrap(), b"done");
    }

    #[test]
    fn empty_payload_frames_to_the_minimum_packet() {
        let data = encode(9, PacketType::Command, "").unwrap();
        assert_eq!(data.len(), 14);
        assert_eq!(&data[0..4], &10i32.to_le_bytes());
        assert_eq!(decode(&data, Field::Payload).unwrap(), b"");
    }

    #[test]
    fn bytes_to_ascii_drops_unprintable_bytes() {
        let raw = b"There are 0 of a max of 20 players online\x00\x07\xff";
        assert_eq!(
            bytes_to_ascii(raw),
            "There are 0 of a max of 20 players online"
        );
    }
}
