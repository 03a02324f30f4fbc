#![no_main]

use gitreel_git::decode_status_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(changes) = decode_status_line(data) {
        assert!(matches!(changes.len(), 1 | 2));
    }
});
