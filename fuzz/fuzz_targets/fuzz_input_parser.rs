#![no_main]

use libfuzzer_sys::fuzz_target;
use ordex::input::{parse_key, parse_range};
use ordex::KEY_RANGE;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(key) = parse_key(text) {
            assert!(KEY_RANGE.contains(&key));
        }
        let _ = parse_range(text);
    }
});
