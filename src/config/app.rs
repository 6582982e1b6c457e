/// Application runtime configuration
///
/// Carries everything the reference firmware kept as compile-time constants.
/// `Default` reproduces the reference values: a 30 s duty cycle with up to
/// 5 s of jitter, application data on port 2, class control on port 3, and
/// three join trials.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base transmission period in milliseconds
    pub tx_period_ms: u32,
    /// Upper bound of the random jitter added to each period, in
    /// milliseconds. Zero disables jitter entirely.
    pub jitter_max_ms: u32,
    /// Application data port for uplinks and downlinks
    pub app_port: u8,
    /// Reserved downlink port carrying class-switch commands
    pub class_port: u8,
    /// Maximum number of join trials performed by the MAC layer
    pub join_trials: u8,
    /// Adaptive Data Rate enabled (the end-device is assumed static)
    pub adr_enabled: bool,
    /// Default data rate index handed to the MAC layer
    pub data_rate: u8,
    /// Default transmit power index handed to the MAC layer
    pub tx_power: u8,
    /// Join a public network (standard sync word)
    pub public_network: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tx_period_ms: 30_000,
            jitter_max_ms: 5_000,
            app_port: 2,
            class_port: 3,
            join_trials: 3,
            adr_enabled: true,
            data_rate: 0,
            tx_power: 0,
            public_network: true,
        }
    }
}
