use thiserror::Error;

/// Errors reported by the driver. All of them are recoverable: the caller
/// decides whether to retry the exchange.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An argument was outside its documented range. Nothing was written to
    /// the transport.
    #[error("argument outside the documented range")]
    InvalidArgument,

    /// The requested frame would not fit the message buffer. Nothing was
    /// written to the transport.
    #[error("payload too large for a protocol frame")]
    PayloadTooLarge,

    /// The transport failed while sending the request.
    #[error("serial write failed")]
    WriteFailure,

    /// The transport failed while collecting the response.
    #[error("serial read failed")]
    ReadFailure,

    /// No response byte arrived within the configured timeout.
    #[error("timed out waiting for a response")]
    Timeout,

    /// The response did not have the length this command requires.
    #[error("unexpected response length: expected {expected} bytes, got {actual}")]
    UnexpectedLength {
        /// Length the command expects.
        expected: usize,
        /// Length actually received.
        actual: usize,
    },

    /// The trailing checksum byte does not match the frame contents.
    #[error("checksum mismatch: computed 0x{computed:02X}, frame carries 0x{received:02X}")]
    ChecksumMismatch {
        /// Checksum recomputed over the received bytes.
        computed: u8,
        /// Checksum byte the frame carried.
        received: u8,
    },

    /// The length field inside the frame disagrees with the received length.
    #[error("length field mismatch: frame declares {declared}, received {actual}")]
    LengthFieldMismatch {
        /// Value of the frame's length field.
        declared: u8,
        /// Length the frame should have declared.
        actual: u8,
    },

    /// The sensor rejected the command. Code 0x02 means the command was not
    /// recognized or carried a bad checksum or argument.
    #[error("sensor rejected the command with code 0x{code:02X}")]
    Nak {
        /// Error code from the NAK frame.
        code: u8,
    },

    /// The response was well-formed but matched no expected pattern: wrong
    /// direction marker, wrong command echo, a NAK of nonstandard length, or
    /// a payload value the protocol does not define.
    #[error("response matched no expected frame pattern")]
    UnknownFrame,

    /// A version string payload was not valid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
}
