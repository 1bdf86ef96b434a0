#![no_main]

use expr_calculator::{DomainError, Service};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid spending time past the length cap
    if data.len() > 2048 {
        return;
    }
    let input = String::from_utf8_lossy(data);
    let service = Service::default();

    match service.evaluate(&input) {
        Ok(value) => assert!(value.is_finite(), "non-finite result for {input:?}"),
        Err(e) => {
            // Every failure renders to a non-empty message and stays stable
            assert!(!e.to_string().is_empty());
            let again: Result<f64, DomainError> = service.evaluate(&input);
            assert_eq!(again.err(), Some(e));
        }
    }
});
