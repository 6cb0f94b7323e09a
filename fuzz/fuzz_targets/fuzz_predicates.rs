#![no_main]

use libfuzzer_sys::fuzz_target;
use macaroons::checker::{Checker, ContextChecker};
use macaroons::predicate::Predicate;
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(predicate) = Predicate::parse(s) {
        let mut context = HashMap::new();
        for value in [predicate.value, "", "0", "-456", "1e308", "NaN", "zzz"] {
            context.insert(predicate.key.to_string(), value.to_string());
            let _ = predicate.evaluate(&context);
        }
    }

    // The checker must decline gracefully on anything
    let checker = ContextChecker::empty().with("account", "alice").with("count", "10");
    let _ = checker.check(data);
});
