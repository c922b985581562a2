//! Request framing and response validation.
//!
//! Every frame in the CM1106 UART protocol shares one layout:
//!
//! ```text
//! +--------+-----+-----+---------------+----------+
//! | marker | len | cmd | payload[0..n] | checksum |
//! +--------+-----+-----+---------------+----------+
//! ```
//!
//! `len` counts everything after the marker except the checksum (total
//! length minus 3), and the checksum is chosen so that the byte sum of the
//! whole frame is zero modulo 256.

use crate::constants::{ACK_MARKER, MIN_FRAME_LEN, NAK_MARKER, REQUEST_MARKER};
use crate::error::Error;

/// A response frame that passed checksum and length-field validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'a> {
    /// Positive acknowledgement carrying the response payload.
    Ack(&'a [u8]),
    /// The sensor rejected the request.
    Nak {
        /// Error code reported by the sensor.
        code: u8,
    },
}

/// Computes the checksum over a frame body (everything except the trailing
/// checksum slot): the two's complement of the byte sum.
pub fn checksum(body: &[u8]) -> u8 {
    let sum = body.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte));
    0u8.wrapping_sub(sum)
}

/// Builds a request frame for `cmd` into `buf` and returns the total frame
/// length. Fails without writing anything when the frame would not fit.
pub fn build(buf: &mut [u8], cmd: u8, payload: &[u8]) -> Result<usize, Error> {
    let total = MIN_FRAME_LEN + payload.len();
    if total > buf.len() {
        return Err(Error::PayloadTooLarge);
    }
    buf[0] = REQUEST_MARKER;
    buf[1] = (total - 3) as u8;
    buf[2] = cmd;
    buf[3..3 + payload.len()].copy_from_slice(payload);
    buf[total - 1] = checksum(&buf[..total - 1]);
    Ok(total)
}

/// Validates a received frame and classifies it.
///
/// `cmd` is the command code an acknowledgement must echo. Checks run in a
/// fixed order: minimum length, checksum, length field, classification; the
/// first violation wins.
pub fn parse(frame: &[u8], cmd: u8) -> Result<Response<'_>, Error> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(Error::UnexpectedLength {
            expected: MIN_FRAME_LEN,
            actual: frame.len(),
        });
    }
    let received = frame[frame.len() - 1];
    let computed = checksum(&frame[..frame.len() - 1]);
    if computed != received {
        return Err(Error::ChecksumMismatch { computed, received });
    }
    let declared = frame[1];
    let actual = (frame.len() - 3) as u8;
    if declared != actual {
        return Err(Error::LengthFieldMismatch { declared, actual });
    }
    match frame[0] {
        ACK_MARKER if frame[2] == cmd => Ok(Response::Ack(&frame[3..frame.len() - 1])),
        NAK_MARKER if frame.len() == MIN_FRAME_LEN => Ok(Response::Nak { code: frame[2] }),
        _ => Err(Error::UnknownFrame),
    }
}
