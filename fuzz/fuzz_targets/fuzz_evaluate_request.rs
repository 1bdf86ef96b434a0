#![no_main]

use expr_calculator::api::rest::dto::EvaluateRequest;
use expr_calculator::Service;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    // Arbitrary JSON bodies must either be rejected or evaluate without panicking
    if let Ok(request) = serde_json::from_slice::<EvaluateRequest>(data) {
        let _ = Service::default().evaluate(&request.expression);
    }
});
