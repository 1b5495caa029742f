//! Fuzz target for interval parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wodclock_core::duration;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(parsed) = duration::parse(input) {
        let formatted = duration::format_interval(parsed);
        assert_eq!(duration::parse(&formatted), Ok(parsed));
    }
});
