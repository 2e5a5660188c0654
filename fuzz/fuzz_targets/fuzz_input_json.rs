#![no_main]

use floatfolio_core::InputEvent;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(event) = InputEvent::from_json_str(text) else {
        return;
    };
    // Anything finite that decodes must re-encode and decode as the same kind.
    if event.is_finite() {
        let json = event.to_json_string().expect("finite event encodes");
        let again = InputEvent::from_json_str(&json).expect("encoded event decodes");
        assert_eq!(again.kind(), event.kind());
        assert!(again.is_finite());
    }
});
