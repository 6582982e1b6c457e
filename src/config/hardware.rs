/// Supported LoRa transceiver chips
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioChip {
    /// Semtech SX1261 (low power variant)
    Sx1261,
    /// Semtech SX1262
    Sx1262,
    /// Semtech SX1268 (CN470 variant)
    Sx1268,
}

/// Radio hardware wiring
///
/// Pin assignments and module options handed opaquely to the MAC layer's
/// one-time bring-up. The node core never touches the pins itself.
#[derive(Debug, Clone)]
pub struct HardwareConfig {
    /// Transceiver chip on the module
    pub chip: RadioChip,
    /// Radio reset pin
    pub pin_reset: u8,
    /// SPI chip select (NSS) pin
    pub pin_nss: u8,
    /// SPI clock pin
    pub pin_sclk: u8,
    /// SPI MISO pin
    pub pin_miso: u8,
    /// SPI MOSI pin
    pub pin_mosi: u8,
    /// Radio DIO1 interrupt pin
    pub pin_dio1: u8,
    /// Radio BUSY pin
    pub pin_busy: u8,
    /// DIO2 drives the antenna switch (eByte E22 style modules)
    pub dio2_ant_switch: bool,
    /// DIO3 controls the TCXO supply voltage
    pub dio3_tcxo: bool,
    /// DIO3 drives the antenna switch (ISP4520 style modules)
    pub dio3_ant_switch: bool,
}

impl Default for HardwareConfig {
    /// Reference wiring: an eByte E22 (SX1262) module on an ESP32.
    fn default() -> Self {
        Self {
            chip: RadioChip::Sx1262,
            pin_reset: 4,
            pin_nss: 17,
            pin_sclk: 18,
            pin_miso: 19,
            pin_mosi: 23,
            pin_dio1: 21,
            pin_busy: 22,
            dio2_ant_switch: true,
            dio3_tcxo: true,
            dio3_ant_switch: false,
        }
    }
}
