//! Built-in mainnet fixtures, cross-checked by hand against block explorers.
//!
//! `source_tx_index` values are blockchain.info internal transaction indices.

use super::{ExpectedIo, Fixture};

pub const BLOCK_100001_TXID: &str =
    "8131ffb0a2c945ecaf9b9063e59558784f9c3a74741ce6ae2a18d0571dac15bb";

pub const BLOCK_299173_TXID: &str =
    "8e56317360a548e8ef28ec475878ef70d1371bee3526c017ac22ad61ae5740b8";

pub fn mainnet_fixtures() -> Vec<Fixture> {
    vec![block_100001_consolidation(), block_299173_payment()]
}

/// Five 50 BTC-era inputs consolidated into a 250 BTC output plus change
pub fn block_100001_consolidation() -> Fixture {
    Fixture {
        txid: BLOCK_100001_TXID.to_string(),
        block_height: 100001,
        timestamp: 1293624404,
        inputs: vec![
            ExpectedIo::new(0, 5_000_000_000, "1HYAekgNKqQiCadt3fnKdLQFFNLFHPPnCR", 239354),
            ExpectedIo::new(0, 5_000_000_000, "16hwoJvz1xje8HBgoLZcxwo1CwE3cvkb17", 239356),
            ExpectedIo::new(0, 5_000_000_000, "1KWGBfAsuBFzKQ7bhSJV5WbgVNvvQ5R1j2", 239322),
            ExpectedIo::new(0, 5_000_000_000, "15XgnazTwLj7sNPkbUo5vCSKBmR43X5vW4", 239205),
            ExpectedIo::new(0, 5_001_000_000, "16HjHvF5umsgAzaX2ddosB81ttkrVHkvqo", 239162),
        ],
        outputs: vec![
            ExpectedIo::new(0, 25_000_000_000, "15xif4SjXiFi3NDEsmMZCfTdE9jvvVQrjU", 240051),
            ExpectedIo::new(1, 1_000_000, "1NkKLMgbSjXrT7oHagnGmYFhXAWXjJsKCj", 240051),
        ],
    }
}

pub fn block_299173_payment() -> Fixture {
    Fixture {
        txid: BLOCK_299173_TXID.to_string(),
        block_height: 299173,
        timestamp: 1399267359,
        inputs: vec![
            ExpectedIo::new(0, 10_000_000, "1FJNUgMPRyBx6ahPmsH6jiYZHDWBPEHfU7", 55795695),
            ExpectedIo::new(1, 1_380_000, "1JDHTo412L9RCtuGbYw4MBeL1xn7ZTuzLH", 55462552),
        ],
        outputs: vec![
            ExpectedIo::new(0, 100_000, "1JR3x2xNfeFicqJcvzz1gkEhHEewJBb5Zb", 55819527),
            ExpectedIo::new(1, 9_850_000, "18JNSFk8eRZcM8RdqLDSgCiipgnfAYsFef", 55819527),
            ExpectedIo::new(2, 100_000, "1ALKUqxRb2MeFqomLCqeYwDZK6FvLNnP3H", 55819527),
            ExpectedIo::new(3, 1_270_000, "1PA1eHufj8axDWEbYfPtL8HXfA66gTFsFc", 55819527),
        ],
    }
}
