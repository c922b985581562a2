#![cfg_attr(not(test), no_std)]

use core::time::Duration;

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{Read, ReadReady, Write};
use heapless::String;
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod types;
pub use types::*;

mod frame;

/// Represents a CM1106 CO2 sensor connected over UART.
///
/// This struct provides methods to interact with the sensor, such as reading
/// the CO2 concentration, calibrating it, and configuring its settings. It
/// owns the message buffer and drives one request/response exchange at a
/// time: frame a command, send it, collect the reply within the configured
/// timeout, validate it and decode the payload.
///
/// # Type Parameters
///
/// * `Serial`: The type of the serial interface used to communicate with the sensor.
///   It must implement `embedded_io_async::Read`, `Write` and `ReadReady`.
/// * `Delay`: The time source used to pace the receive poll loop, typically
///   the HAL's delay implementation.
pub struct Cm1106<Serial, Delay> {
    serial: Serial,
    delay: Delay,
    config: Config,
    buf: [u8; MSG_BUF_LEN],
}

impl<S, D> Cm1106<S, D>
where
    S: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Creates a new `Cm1106` sensor instance.
    ///
    /// # Arguments
    ///
    /// * `serial`: The serial interface for communication with the sensor.
    /// * `delay`: The time source used while waiting for responses.
    /// * `config`: The initial configuration for the driver.
    ///
    /// # Returns
    ///
    /// A new `Cm1106` instance.
    pub fn new(serial: S, delay: D, config: Config) -> Self {
        Self {
            serial,
            delay,
            config,
            buf: [0; MSG_BUF_LEN],
        }
    }

    /// Reads the current CO2 concentration.
    ///
    /// The sensor reports values below its measuring floor while it is still
    /// warming up; interpreting those is left to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(i16)` containing the CO2 concentration in ppm.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_co2(&mut self) -> Result<i16, Error> {
        debug!("Reading CO2 measurement (CMD 0x01)");
        let payload = self.exchange(CMD_GET_CO2, &[], RESP_LEN_CO2).await?;

        // First two payload bytes carry the measurement, the rest is status.
        let &[high, low, ..] = payload else {
            return Err(Error::UnknownFrame);
        };
        let co2 = i16::from_be_bytes([high, low]);
        debug!("CO2 concentration: {} ppm", co2);
        Ok(co2)
    }

    /// Reads the sensor's serial number.
    ///
    /// # Returns
    ///
    /// * `Ok(SerialNumber)` containing the five 16-bit fields; its `Display`
    ///   implementation renders the concatenated zero-padded decimal form.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_serial_number(&mut self) -> Result<SerialNumber, Error> {
        debug!("Reading serial number (CMD 0x1F)");
        let payload = self
            .exchange(CMD_GET_SERIAL_NUMBER, &[], RESP_LEN_SERIAL_NUMBER)
            .await?;

        let serial = SerialNumber::from_payload(payload);
        debug!("Serial number: {}", serial);
        Ok(serial)
    }

    /// Reads the sensor's firmware version string.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` containing up to 10 characters, truncated at the first
    ///   NUL byte of the reply.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_software_version(&mut self) -> Result<String<SOFTVER_LEN>, Error> {
        debug!("Reading software version (CMD 0x1E)");
        let payload = self
            .exchange(CMD_GET_SOFTWARE_VERSION, &[], RESP_LEN_SOFTWARE_VERSION)
            .await?;

        let raw = &payload[..payload.len().min(SOFTVER_LEN)];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let text = core::str::from_utf8(&raw[..end]).map_err(|_| Error::InvalidUtf8)?;

        // The slice is at most SOFTVER_LEN bytes, so it always fits.
        let mut version = String::new();
        version.push_str(text).map_err(|_| Error::InvalidUtf8)?;
        debug!("Software version: {}", version);
        Ok(version)
    }

    /// Starts a zero-point calibration against a known CO2 concentration.
    ///
    /// The sensor must sit in a stable reference atmosphere (outdoor air is
    /// roughly 400 ppm) while the calibration runs.
    ///
    /// # Arguments
    ///
    /// * `concentration_ppm`: The reference concentration. Must be between
    ///   400 and 1500 ppm (inclusive).
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the calibration command.
    /// * `Err(Error::InvalidArgument)` if `concentration_ppm` is out of range;
    ///   nothing is sent in that case.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn start_calibration(&mut self, concentration_ppm: u16) -> Result<(), Error> {
        if !CALIBRATION_RANGE_PPM.contains(&concentration_ppm) {
            log::error!(
                "Calibration target {} ppm out of range (400-1500)",
                concentration_ppm
            );
            return Err(Error::InvalidArgument);
        }

        debug!("Starting calibration at {} ppm (CMD 0x03)", concentration_ppm);
        let payload = concentration_ppm.to_be_bytes();
        self.exchange(CMD_START_CALIBRATION, &payload, RESP_LEN_ACK)
            .await?;
        Ok(())
    }

    /// Reads the automatic baseline correction settings.
    ///
    /// # Returns
    ///
    /// * `Ok(AbcParams)` containing the ABC state, cycle and baseline.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_abc(&mut self) -> Result<AbcParams, Error> {
        debug!("Reading ABC parameters (CMD 0x0F)");
        let payload = self.exchange(CMD_GET_ABC, &[], RESP_LEN_ABC).await?;

        let &[_, state, cycle_days, high, low, _] = payload else {
            return Err(Error::UnknownFrame);
        };
        let Some(state) = AbcState::from_wire(state) else {
            log::warn!("get_abc: Unknown ABC state byte {:02X}", state);
            return Err(Error::UnknownFrame);
        };
        let params = AbcParams {
            state,
            cycle_days,
            baseline_ppm: u16::from_be_bytes([high, low]),
        };
        debug!("ABC parameters: {:?}", params);
        Ok(params)
    }

    /// Writes the automatic baseline correction settings.
    ///
    /// # Arguments
    ///
    /// * `params`: The ABC settings to apply. The cycle must be between 1 and
    ///   7 days and the baseline between 400 and 1499 ppm (inclusive).
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the change.
    /// * `Err(Error::InvalidArgument)` if a field is out of range; nothing is
    ///   sent in that case.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn set_abc(&mut self, params: AbcParams) -> Result<(), Error> {
        if !ABC_CYCLE_RANGE_DAYS.contains(&params.cycle_days)
            || !ABC_BASELINE_RANGE_PPM.contains(&params.baseline_ppm)
        {
            log::error!("ABC parameters out of range: {:?}", params);
            return Err(Error::InvalidArgument);
        }

        debug!("Setting ABC parameters: {:?} (CMD 0x10)", params);
        let [high, low] = params.baseline_ppm.to_be_bytes();
        let payload = [
            ABC_RESERVED,
            params.state.to_wire(),
            params.cycle_days,
            high,
            low,
            ABC_RESERVED,
        ];
        self.exchange(CMD_SET_ABC, &payload, RESP_LEN_ACK).await?;
        Ok(())
    }

    /// Asks the sensor to persist its current ABC calibration data.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the command.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn store_abc_data(&mut self) -> Result<(), Error> {
        debug!("Storing ABC data (CMD 0x23)");
        self.exchange(CMD_STORE_ABC_DATA, &[], RESP_LEN_ACK).await?;
        Ok(())
    }

    /// Sets the measurement period and the number of samples to smooth over.
    ///
    /// # Arguments
    ///
    /// * `seconds`: The measurement period. Must be between 1 and 600
    ///   (inclusive).
    /// * `smoothing`: The number of samples the sensor averages per reading.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the change.
    /// * `Err(Error::InvalidArgument)` if `seconds` is out of range; nothing
    ///   is sent in that case.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn set_measurement_period(
        &mut self,
        seconds: u16,
        smoothing: u8,
    ) -> Result<(), Error> {
        if !MEASUREMENT_PERIOD_RANGE_SECS.contains(&seconds) {
            log::error!("Measurement period {} s out of range (1-600)", seconds);
            return Err(Error::InvalidArgument);
        }

        debug!(
            "Setting measurement period to {} s, smoothing over {} samples (CMD 0x41)",
            seconds, smoothing
        );
        let [high, low] = seconds.to_be_bytes();
        self.exchange(CMD_MEASUREMENT_PERIOD, &[high, low, smoothing], RESP_LEN_ACK)
            .await?;
        Ok(())
    }

    /// Reads the measurement period and the smoothing setting.
    ///
    /// # Returns
    ///
    /// * `Ok(MeasurementPeriod)` containing the period and smoothing values.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_measurement_period(&mut self) -> Result<MeasurementPeriod, Error> {
        debug!("Reading measurement period (CMD 0x41)");
        let payload = self
            .exchange(CMD_MEASUREMENT_PERIOD, &[], RESP_LEN_MEASUREMENT_PERIOD)
            .await?;

        let &[high, low, smoothing] = payload else {
            return Err(Error::UnknownFrame);
        };
        let period = MeasurementPeriod {
            seconds: u16::from_be_bytes([high, low]),
            smoothing,
        };
        debug!("Measurement period: {:?}", period);
        Ok(period)
    }

    /// Switches the sensor between single-shot and continuous measurement.
    ///
    /// # Arguments
    ///
    /// * `mode`: The `WorkingMode` to set.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the change.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn set_working_mode(&mut self, mode: WorkingMode) -> Result<(), Error> {
        debug!("Setting working mode to {:?} (CMD 0x45)", mode);
        self.exchange(CMD_WORKING_STATUS, &[mode.to_wire()], RESP_LEN_ACK)
            .await?;
        Ok(())
    }

    /// Reads the sensor's current working mode.
    ///
    /// # Returns
    ///
    /// * `Ok(WorkingMode)` containing the current mode.
    /// * `Err(Error)` if the exchange failed or the reply was malformed.
    pub async fn get_working_mode(&mut self) -> Result<WorkingMode, Error> {
        debug!("Reading working mode (CMD 0x45)");
        let payload = self
            .exchange(CMD_WORKING_STATUS, &[], RESP_LEN_WORKING_STATUS)
            .await?;

        let &[mode] = payload else {
            return Err(Error::UnknownFrame);
        };
        let Some(mode) = WorkingMode::from_wire(mode) else {
            log::warn!("get_working_mode: Unknown mode byte {:02X}", mode);
            return Err(Error::UnknownFrame);
        };
        debug!("Working mode: {:?}", mode);
        Ok(mode)
    }

    /// Sends a bare request for `code` and reports whether the sensor
    /// answered it with a valid acknowledgement.
    ///
    /// Firmware revisions differ in which commands they implement; iterating
    /// `PROBE_CMD_RANGE` maps the supported set. Every unanswered probe costs
    /// the full response timeout, so this is a bench diagnostic rather than
    /// something to run on a production path.
    ///
    /// # Arguments
    ///
    /// * `code`: The command code to probe.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if a valid acknowledgement echoing `code` arrived.
    /// * `Ok(false)` on a rejection, a malformed reply or no reply at all.
    /// * `Err(Error)` only for transport failures.
    #[cfg(feature = "probe")]
    pub async fn probe_command(&mut self, code: u8) -> Result<bool, Error> {
        debug!("Probing command {:02X}", code);
        self.send_request(code, &[]).await?;
        let collected = self
            .read_response(MSG_BUF_LEN, self.config.response_timeout)
            .await?;

        if collected == 0 {
            debug!("Command {:02X} went unanswered", code);
            return Ok(false);
        }
        debug!("Probe reply: {:02X?}", &self.buf[..collected]);
        match frame::parse(&self.buf[..collected], code) {
            Ok(frame::Response::Ack(_)) => Ok(true),
            Ok(frame::Response::Nak { code: reason }) => {
                debug!("Command {:02X} rejected with code {:02X}", code, reason);
                Ok(false)
            }
            Err(_) => Ok(false),
        }
    }

    // Performs one full exchange: frame the command, send it, collect exactly
    // `expected` bytes and validate the reply. Returns the response payload,
    // which lives inside the message buffer.
    async fn exchange(&mut self, cmd: u8, payload: &[u8], expected: usize) -> Result<&[u8], Error> {
        self.send_request(cmd, payload).await?;
        let collected = self
            .read_response(expected, self.config.response_timeout)
            .await?;

        if collected == 0 {
            log::error!(
                "No response to command {:02X} within {:?}",
                cmd,
                self.config.response_timeout
            );
            return Err(Error::Timeout);
        }
        debug!("Bytes received: {:02X?}", &self.buf[..collected]);
        if collected != expected {
            log::error!(
                "Short response to command {:02X}: expected {} bytes, got {}",
                cmd,
                expected,
                collected
            );
            return Err(Error::UnexpectedLength {
                expected,
                actual: collected,
            });
        }

        match frame::parse(&self.buf[..collected], cmd) {
            Ok(frame::Response::Ack(response_payload)) => Ok(response_payload),
            Ok(frame::Response::Nak { code }) => {
                log::error!("Sensor rejected command {:02X} with code {:02X}", cmd, code);
                Err(Error::Nak { code })
            }
            Err(e) => {
                log::error!("Invalid response to command {:02X}: {}", cmd, e);
                Err(e)
            }
        }
    }

    // Frames `cmd` with `payload` into the message buffer and writes it out,
    // flushing before returning.
    async fn send_request(&mut self, cmd: u8, payload: &[u8]) -> Result<(), Error> {
        let len = frame::build(&mut self.buf, cmd, payload)?;

        debug!("Bytes to send: {:02X?}", &self.buf[..len]);
        self.serial
            .write_all(&self.buf[..len])
            .await
            .map_err(|_| Error::WriteFailure)?;
        self.serial.flush().await.map_err(|_| Error::WriteFailure)?;
        Ok(())
    }

    // Collects up to `expected` bytes into the message buffer, polling the
    // transport's readiness signal and charging idle polls against `timeout`.
    // Returns the number of bytes collected; fewer than `expected` means the
    // timeout lapsed (0 when nothing arrived at all).
    async fn read_response(&mut self, expected: usize, timeout: Duration) -> Result<usize, Error> {
        let expected = expected.min(MSG_BUF_LEN);
        let mut collected = 0;
        let mut waited = Duration::ZERO;

        while collected < expected {
            let ready = self.serial.read_ready().map_err(|_| Error::ReadFailure)?;
            if ready {
                let count = self
                    .serial
                    .read(&mut self.buf[collected..expected])
                    .await
                    .map_err(|_| Error::ReadFailure)?;
                if count == 0 {
                    // End of stream; validation deals with whatever arrived.
                    break;
                }
                collected += count;
            } else {
                if waited >= timeout {
                    break;
                }
                self.delay.delay_ms(RX_POLL_INTERVAL_MS).await;
                waited += Duration::from_millis(u64::from(RX_POLL_INTERVAL_MS));
            }
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use embedded_io_async::ErrorType;

    /// Serial double scripted with the bytes the sensor will answer with,
    /// recording everything the driver writes.
    struct MockSerial {
        rx: VecDeque<u8>,
        tx: Rc<RefCell<Vec<u8>>>,
        read_chunk: usize,
    }

    impl MockSerial {
        fn new(rx: &[u8]) -> (Self, Rc<RefCell<Vec<u8>>>) {
            let tx = Rc::new(RefCell::new(Vec::new()));
            let serial = Self {
                rx: rx.iter().copied().collect(),
                tx: Rc::clone(&tx),
                read_chunk: usize::MAX,
            };
            (serial, tx)
        }

        /// Caps how many bytes a single `read` call hands over, to exercise
        /// reassembly of fragmented replies.
        fn with_read_chunk(mut self, chunk: usize) -> Self {
            self.read_chunk = chunk;
            self
        }
    }

    impl ErrorType for MockSerial {
        type Error = core::convert::Infallible;
    }

    impl Read for MockSerial {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let count = buf.len().min(self.read_chunk).min(self.rx.len());
            for slot in &mut buf[..count] {
                *slot = self.rx.pop_front().unwrap();
            }
            Ok(count)
        }
    }

    impl Write for MockSerial {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.tx.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl ReadReady for MockSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    /// Delay double that only accumulates virtual time.
    struct MockDelay {
        elapsed_ns: Rc<Cell<u64>>,
    }

    impl MockDelay {
        fn new() -> (Self, Rc<Cell<u64>>) {
            let elapsed = Rc::new(Cell::new(0));
            let delay = Self {
                elapsed_ns: Rc::clone(&elapsed),
            };
            (delay, elapsed)
        }
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
        }
    }

    fn ack_frame(cmd: u8, payload: &[u8]) -> Vec<u8> {
        let mut reply = vec![ACK_MARKER, (payload.len() + 1) as u8, cmd];
        reply.extend_from_slice(payload);
        reply.push(frame::checksum(&reply));
        reply
    }

    fn nak_frame(code: u8) -> Vec<u8> {
        let mut reply = vec![NAK_MARKER, 0x01, code];
        reply.push(frame::checksum(&reply));
        reply
    }

    fn sensor(
        rx: &[u8],
    ) -> (
        Cm1106<MockSerial, MockDelay>,
        Rc<RefCell<Vec<u8>>>,
        Rc<Cell<u64>>,
    ) {
        let (serial, tx) = MockSerial::new(rx);
        let (delay, elapsed) = MockDelay::new();
        (Cm1106::new(serial, delay, Config::default()), tx, elapsed)
    }

    #[tokio::test]
    async fn get_co2_sends_the_documented_frame_and_decodes_the_reply() {
        let (mut sensor, tx, _) = sensor(&ack_frame(CMD_GET_CO2, &[0x02, 0x26, 0x00, 0x00]));

        let co2 = sensor.get_co2().await.unwrap();

        assert_eq!(co2, 550);
        assert_eq!(tx.borrow().as_slice(), &[0x11, 0x01, 0x01, 0xED]);
    }

    #[tokio::test]
    async fn get_co2_reassembles_a_reply_arriving_byte_by_byte() {
        let reply = ack_frame(CMD_GET_CO2, &[0x03, 0xE8, 0x00, 0x00]);
        let (serial, _tx) = MockSerial::new(&reply);
        let (delay, _) = MockDelay::new();
        let mut sensor = Cm1106::new(serial.with_read_chunk(1), delay, Config::default());

        assert_eq!(sensor.get_co2().await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn a_silent_sensor_times_out_after_the_configured_budget() {
        let (mut sensor, _tx, elapsed) = sensor(&[]);

        let err = sensor.get_co2().await.unwrap_err();

        assert_eq!(err, Error::Timeout);
        let waited = Duration::from_nanos(elapsed.get());
        assert!(
            waited >= Duration::from_secs(5),
            "gave up after only {:?}",
            waited
        );
        assert!(
            waited < Duration::from_secs(6),
            "kept waiting for {:?}",
            waited
        );
    }

    #[tokio::test]
    async fn a_corrupted_checksum_is_reported() {
        let mut reply = ack_frame(CMD_GET_CO2, &[0x02, 0x26, 0x00, 0x00]);
        let last = reply.len() - 1;
        reply[last] ^= 0xFF;
        let (mut sensor, _tx, _) = sensor(&reply);

        assert!(matches!(
            sensor.get_co2().await,
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn a_reply_echoing_another_command_is_reported() {
        let reply = ack_frame(CMD_GET_ABC, &[0x00, 0x00, 0x00, 0x00]);
        let (mut sensor, _tx, _) = sensor(&reply);

        assert_eq!(sensor.get_co2().await.unwrap_err(), Error::UnknownFrame);
    }

    #[tokio::test]
    async fn a_rejection_carries_the_sensor_error_code() {
        let (mut sensor, _tx, _) = sensor(&nak_frame(0x02));

        let err = sensor.store_abc_data().await.unwrap_err();

        assert_eq!(err, Error::Nak { code: 0x02 });
    }

    #[tokio::test]
    async fn a_rejection_of_a_read_surfaces_as_a_length_mismatch() {
        let (mut sensor, _tx, _) = sensor(&nak_frame(0x02));

        let err = sensor.get_co2().await.unwrap_err();

        assert_eq!(
            err,
            Error::UnexpectedLength {
                expected: 8,
                actual: 4
            }
        );
    }

    #[tokio::test]
    async fn calibration_bounds_are_checked_before_any_traffic() {
        let (mut sensor, tx, elapsed) = sensor(&[]);

        assert_eq!(
            sensor.start_calibration(399).await,
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            sensor.start_calibration(1501).await,
            Err(Error::InvalidArgument)
        );
        assert!(tx.borrow().is_empty());
        assert_eq!(elapsed.get(), 0);
    }

    #[tokio::test]
    async fn calibration_accepts_both_range_endpoints() {
        let script = [
            ack_frame(CMD_START_CALIBRATION, &[]),
            ack_frame(CMD_START_CALIBRATION, &[]),
        ]
        .concat();
        let (mut sensor, tx, _) = sensor(&script);

        sensor.start_calibration(400).await.unwrap();
        sensor.start_calibration(1500).await.unwrap();

        let sent = tx.borrow();
        assert_eq!(&sent[..6], &[0x11, 0x03, 0x03, 0x01, 0x90, 0x58]);
        assert_eq!(&sent[6..], &[0x11, 0x03, 0x03, 0x05, 0xDC, 0x08]);
    }

    #[tokio::test]
    async fn abc_bounds_are_checked_before_any_traffic() {
        let (mut sensor, tx, _) = sensor(&[]);
        let invalid = [
            AbcParams {
                state: AbcState::Open,
                cycle_days: 0,
                baseline_ppm: 400,
            },
            AbcParams {
                state: AbcState::Open,
                cycle_days: 8,
                baseline_ppm: 400,
            },
            AbcParams {
                state: AbcState::Open,
                cycle_days: 7,
                baseline_ppm: 399,
            },
            AbcParams {
                state: AbcState::Open,
                cycle_days: 7,
                baseline_ppm: 1500,
            },
        ];

        for params in invalid {
            assert_eq!(sensor.set_abc(params).await, Err(Error::InvalidArgument));
        }
        assert!(tx.borrow().is_empty());
    }

    #[tokio::test]
    async fn set_abc_encodes_the_documented_payload() {
        let (mut sensor, tx, _) = sensor(&ack_frame(CMD_SET_ABC, &[]));

        sensor
            .set_abc(AbcParams {
                state: AbcState::Open,
                cycle_days: 7,
                baseline_ppm: 400,
            })
            .await
            .unwrap();

        assert_eq!(
            tx.borrow().as_slice(),
            &[0x11, 0x07, 0x10, 0x64, 0x00, 0x07, 0x01, 0x90, 0x64, 0x78]
        );
    }

    #[tokio::test]
    async fn get_abc_decodes_the_parameter_block() {
        let reply = ack_frame(
            CMD_GET_ABC,
            &[ABC_RESERVED, ABC_CLOSE, 0x07, 0x01, 0x90, ABC_RESERVED],
        );
        let (mut sensor, _tx, _) = sensor(&reply);

        let params = sensor.get_abc().await.unwrap();

        assert_eq!(
            params,
            AbcParams {
                state: AbcState::Close,
                cycle_days: 7,
                baseline_ppm: 400,
            }
        );
    }

    #[tokio::test]
    async fn serial_number_renders_as_five_zero_padded_groups() {
        let payload = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00, 0x05];
        let (mut sensor, _tx, _) = sensor(&ack_frame(CMD_GET_SERIAL_NUMBER, &payload));

        let serial = sensor.get_serial_number().await.unwrap();

        assert_eq!(serial, SerialNumber([1, 2, 3, 4, 5]));
        assert_eq!(serial.to_string(), "00010002000300040005");
    }

    #[tokio::test]
    async fn software_version_is_trimmed_at_the_first_nul() {
        let reply = ack_frame(CMD_GET_SOFTWARE_VERSION, b"1.07\0\0\0\0\0\0\0");
        let (mut sensor, _tx, _) = sensor(&reply);

        let version = sensor.get_software_version().await.unwrap();

        assert_eq!(version.as_str(), "1.07");
    }

    #[tokio::test]
    async fn measurement_period_bounds_are_checked_before_any_traffic() {
        let (mut sensor, tx, _) = sensor(&[]);

        assert_eq!(
            sensor.set_measurement_period(0, 1).await,
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            sensor.set_measurement_period(601, 1).await,
            Err(Error::InvalidArgument)
        );
        assert!(tx.borrow().is_empty());
    }

    #[tokio::test]
    async fn measurement_period_round_trips() {
        let script = [
            ack_frame(CMD_MEASUREMENT_PERIOD, &[]),
            ack_frame(CMD_MEASUREMENT_PERIOD, &[0x00, 0x1E, 0x04]),
        ]
        .concat();
        let (mut sensor, tx, _) = sensor(&script);

        sensor.set_measurement_period(30, 4).await.unwrap();
        let period = sensor.get_measurement_period().await.unwrap();

        assert_eq!(
            period,
            MeasurementPeriod {
                seconds: 30,
                smoothing: 4,
            }
        );
        assert_eq!(
            &tx.borrow()[..7],
            &[0x11, 0x04, 0x41, 0x00, 0x1E, 0x04, 0x88]
        );
    }

    #[tokio::test]
    async fn working_mode_round_trips() {
        let script = [
            ack_frame(CMD_WORKING_STATUS, &[]),
            ack_frame(CMD_WORKING_STATUS, &[WORKING_MODE_CONTINUOUS]),
        ]
        .concat();
        let (mut sensor, tx, _) = sensor(&script);

        sensor
            .set_working_mode(WorkingMode::Continuous)
            .await
            .unwrap();
        let mode = sensor.get_working_mode().await.unwrap();

        assert_eq!(mode, WorkingMode::Continuous);
        assert_eq!(&tx.borrow()[..5], &[0x11, 0x02, 0x45, 0x01, 0xA7]);
    }

    #[tokio::test]
    async fn an_unknown_working_mode_byte_is_rejected() {
        let reply = ack_frame(CMD_WORKING_STATUS, &[0x07]);
        let (mut sensor, _tx, _) = sensor(&reply);

        assert_eq!(
            sensor.get_working_mode().await.unwrap_err(),
            Error::UnknownFrame
        );
    }

    #[test]
    fn default_config_waits_five_seconds() {
        assert_eq!(Config::default().response_timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "probe")]
    mod probe {
        use super::*;

        #[tokio::test]
        async fn an_acknowledged_command_probes_true() {
            let (mut sensor, _tx, _) = sensor(&ack_frame(0x42, &[0x01]));

            assert!(sensor.probe_command(0x42).await.unwrap());
        }

        #[tokio::test]
        async fn a_rejected_command_probes_false() {
            let (mut sensor, _tx, _) = sensor(&nak_frame(0x02));

            assert!(!sensor.probe_command(0x42).await.unwrap());
        }

        #[tokio::test]
        async fn an_unanswered_command_probes_false() {
            let (mut sensor, _tx, _) = sensor(&[]);

            assert!(!sensor.probe_command(0x42).await.unwrap());
        }
    }
}
