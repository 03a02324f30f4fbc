#![no_main]

use gitreel_git::{ScheduleOptions, TimeReference, parse_log, schedule};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Non-UTF-8 input surfaces as a read error, never a panic
    let Ok(mut response) = parse_log(data, TimeReference::Utc) else {
        return;
    };
    for op in &response.updates {
        assert!(!op.updates.is_empty());
        assert!(op.updates.iter().all(|f| op.dir.len() < f.file.len()));
    }
    if let Ok(options) = ScheduleOptions::new(1000.0, 300.0) {
        schedule(&mut response.updates, &options);
        for op in &response.updates {
            assert!(op.duration > 0.0);
        }
    }
});
