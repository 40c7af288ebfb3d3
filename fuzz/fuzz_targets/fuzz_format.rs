//! Fuzz target for card formatting.
//!
//! Tests that formatting functions never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_checker::{format, Network};

fuzz_target!(|data: &str| {
    let _ = format::format_with_separator(data, "-");
    let _ = format::format_with_separator(data, "");
    let _ = format::format_partial(data);
    let _ = format::split_into_groups(data);
    let _ = format::is_valid_format(data);

    for network in Network::ALL {
        let _ = format::format_for_network(data, network);
        let _ = format::format_for_network_with_separator(data, network, "-");
    }

    // Formatting keeps every digit and is idempotent.
    let formatted = format::format_for_display(data);
    assert_eq!(format::strip_non_digits(&formatted), format::strip_non_digits(data));
    assert_eq!(format::format_for_display(&formatted), formatted);
});
