//! Fuzz target: configuration line parser
//!
//! Feeds arbitrary bytes to the fixed-width configuration decoder and
//! verifies:
//! - No panics, whatever the length, encoding or characters
//! - Every accepted line re-encodes to exactly the same bytes
//!
//! cargo fuzz run fuzz_config_line

#![no_main]

use enclosure::config::ControllerConfig;
use enclosure::records::config_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    let defaults = ControllerConfig::default();
    let Ok(config) = config_line::decode(line, &defaults) else {
        return;
    };

    // Check-in fields are not kept, so compare from the goal column on.
    if let Ok(encoded) = config_line::encode(&config) {
        assert_eq!(&encoded.as_bytes()[17..], &line.as_bytes()[17..]);
    }
});
