// berry/src/device/models/pn532/commands.rs

//! PN532 command payload builders. Payloads start with the command code;
//! framing happens in the driver.

use super::config::*;

pub fn get_firmware_version() -> &'static [u8] {
    &[CMD_GET_FIRMWARE_VERSION]
}

pub fn sam_configuration() -> &'static [u8] {
    &[CMD_SAM_CONFIGURATION, SAM_MODE_NORMAL, SAM_TIMEOUT, SAM_USE_IRQ]
}

pub fn set_max_retries(max: u8) -> [u8; 5] {
    [
        CMD_RF_CONFIGURATION,
        RF_ITEM_MAX_RETRIES,
        RF_MAX_RETRY_ATR,
        RF_MAX_RETRY_PSL,
        max,
    ]
}

/// InListPassiveTarget for at most one target
pub fn in_list_passive_target(brty: u8) -> [u8; 3] {
    [CMD_IN_LIST_PASSIVE_TARGET, 0x01, brty]
}

pub fn in_data_exchange(target: u8, data: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(data.len() + 2);
    v.push(CMD_IN_DATA_EXCHANGE);
    v.push(target);
    v.extend_from_slice(data);
    v
}

pub fn in_release(target: u8) -> [u8; 2] {
    [CMD_IN_RELEASE, target]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_layouts() {
        assert_eq!(sam_configuration(), &[0x14, 0x01, 0x14, 0x01]);
        assert_eq!(set_max_retries(3), [0x32, 0x05, 0xFF, 0x01, 0x03]);
        assert_eq!(in_list_passive_target(0x00), [0x4A, 0x01, 0x00]);
        assert_eq!(in_data_exchange(1, &[0x30, 4]), vec![0x40, 0x01, 0x30, 0x04]);
        assert_eq!(in_release(1), [0x52, 0x01]);
    }
}
