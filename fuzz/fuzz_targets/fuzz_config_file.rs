//! Fuzz target: configuration file load
//!
//! Places arbitrary bytes in `system.txt` on the in-memory medium and runs
//! the full load path (header read, line read, parse, validate):
//! - No panics
//! - A successful load always yields a configuration that validates
//!
//! cargo fuzz run fuzz_config_file

#![no_main]

use enclosure::adapters::mem_storage::MemStorage;
use enclosure::config::ControllerConfig;
use enclosure::records::RecordStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", data);
    let mut store = RecordStore::new(storage, ControllerConfig::default());
    if let Ok(load) = store.load_configuration() {
        assert!(load.config.validate().is_ok());
    }
});
