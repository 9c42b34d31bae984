#![no_main]

use libfuzzer_sys::fuzz_target;
use barista::{Runtime, RuntimeConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Either a config error or a runtime that builds
    if let Ok(config) = RuntimeConfig::from_json_str(text) {
        assert!(config.max_properties > 0);
        if config.max_properties >= 64 {
            let _ = Runtime::with_config(config).expect("validated config must build");
        }
    }
});
