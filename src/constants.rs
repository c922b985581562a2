use core::ops::RangeInclusive;
use core::time::Duration;

// REQUEST_MARKER is the byte that identifies a command frame sent to the sensor.
pub const REQUEST_MARKER: u8 = 0x11;

// ACK_MARKER is the byte that identifies a positive response frame received
// from the sensor.
pub const ACK_MARKER: u8 = 0x16;

// NAK_MARKER is the byte that identifies a negative response frame, sent when
// the sensor rejects a command. NAK frames are always 4 bytes long and carry
// an error code in place of the command echo.
pub const NAK_MARKER: u8 = 0x06;

// MSG_BUF_LEN is the capacity of the message buffer shared by every exchange.
// The longest frame in the protocol is the 15-byte software version response.
pub const MSG_BUF_LEN: usize = 20;

// MIN_FRAME_LEN is the length of a frame with an empty payload:
// marker, length field, command and checksum.
pub const MIN_FRAME_LEN: usize = 4;

// RX_POLL_INTERVAL_MS is how long the receiver sleeps between polls of the
// transport readiness signal while waiting for response bytes.
pub const RX_POLL_INTERVAL_MS: u32 = 5;

// DEFAULT_RESPONSE_TIMEOUT is the sensor's documented worst-case time to
// answer any command.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

// Command codes.

pub const CMD_GET_CO2: u8 = 0x01; // Read the CO2 measurement
pub const CMD_START_CALIBRATION: u8 = 0x03; // Calibrate against a known concentration
pub const CMD_GET_ABC: u8 = 0x0F; // Read automatic baseline correction parameters
pub const CMD_SET_ABC: u8 = 0x10; // Write automatic baseline correction parameters
pub const CMD_GET_SOFTWARE_VERSION: u8 = 0x1E; // Read the firmware version string
pub const CMD_GET_SERIAL_NUMBER: u8 = 0x1F; // Read the serial number
pub const CMD_STORE_ABC_DATA: u8 = 0x23; // Persist ABC calibration data
pub const CMD_MEASUREMENT_PERIOD: u8 = 0x41; // Read (bare) or write (with payload) the measurement period
pub const CMD_WORKING_STATUS: u8 = 0x45; // Read (bare) or write (with payload) the working mode

// Expected response lengths, including header and checksum.

pub const RESP_LEN_ACK: usize = 4; // Bare acknowledgement of a write command
pub const RESP_LEN_WORKING_STATUS: usize = 5;
pub const RESP_LEN_MEASUREMENT_PERIOD: usize = 7;
pub const RESP_LEN_CO2: usize = 8;
pub const RESP_LEN_ABC: usize = 10;
pub const RESP_LEN_SERIAL_NUMBER: usize = 14;
pub const RESP_LEN_SOFTWARE_VERSION: usize = 15;

// SOFTVER_LEN is the number of payload bytes that carry the firmware version
// text in a software version response.
pub const SOFTVER_LEN: usize = 10;

// ABC wire values.

pub const ABC_OPEN: u8 = 0x00; // Automatic baseline correction enabled
pub const ABC_CLOSE: u8 = 0x02; // Automatic baseline correction disabled
pub const ABC_RESERVED: u8 = 0x64; // Filler byte framing the ABC payload on both sides

// Working mode wire values.

pub const WORKING_MODE_SINGLE: u8 = 0x00; // One measurement per trigger
pub const WORKING_MODE_CONTINUOUS: u8 = 0x01; // Free-running measurement

// Argument ranges enforced before any transport traffic.

pub const CALIBRATION_RANGE_PPM: RangeInclusive<u16> = 400..=1500;
pub const ABC_CYCLE_RANGE_DAYS: RangeInclusive<u8> = 1..=7;
pub const ABC_BASELINE_RANGE_PPM: RangeInclusive<u16> = 400..=1499;
pub const MEASUREMENT_PERIOD_RANGE_SECS: RangeInclusive<u16> = 1..=600;

// PROBE_CMD_RANGE is the command space the vendor firmware answers probes in.
#[cfg(feature = "probe")]
pub const PROBE_CMD_RANGE: RangeInclusive<u8> = 0x01..=0x5F;
