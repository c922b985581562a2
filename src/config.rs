use core::time::Duration;

use crate::constants::DEFAULT_RESPONSE_TIMEOUT;

/// Configuration settings for the CM1106 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long to wait for the sensor to answer a command before the
    /// exchange is abandoned.
    pub response_timeout: Duration,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `response_timeout` - The per-exchange response timeout.
    ///
    /// # Returns
    ///
    /// A new `Config` instance with the specified timeout.
    pub fn new(response_timeout: Duration) -> Config {
        Config { response_timeout }
    }

    /// Sets the response timeout for the configuration.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The per-exchange response timeout.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

/// Provides default configuration values for the CM1106 driver.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// The default configuration waits 5 seconds for each response, the
    /// sensor's documented worst case.
    fn default() -> Config {
        Config {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
