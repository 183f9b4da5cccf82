// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use knot_gateway_core::trust::{ConfigEntry, EventFlags, Limit};
use knot_gateway_core::validate::validate_config;

fn entry(event_flags: EventFlags, time_sec: u16, lower: Limit, upper: Limit) -> ConfigEntry {
    ConfigEntry {
        sensor_id: 1,
        event_flags,
        time_sec,
        lower_limit: lower,
        upper_limit: upper,
    }
}

/// Property 7: exhaustively exercise the event-flag subset rule, the TIME
/// <=> time_sec>0 rule, and the threshold ordering rule together.
#[test]
fn every_known_flag_combination_with_consistent_time_is_accepted() {
    let known = [
        EventFlags::NONE,
        EventFlags::LOWER_THRESHOLD,
        EventFlags::UPPER_THRESHOLD,
        EventFlags::LOWER_THRESHOLD | EventFlags::UPPER_THRESHOLD,
        EventFlags::CHANGE,
        EventFlags::UNREGISTERED,
        EventFlags::TIME,
    ];

    for &flags in &known {
        let time_sec = if flags.contains(EventFlags::TIME) { 60 } else { 0 };
        let e = entry(flags, time_sec, Limit::new(0, 0), Limit::new(1, 0));
        assert!(validate_config(&[e]).is_ok(), "flags={flags:?} should validate");
    }
}

#[test]
fn bits_outside_the_known_set_are_always_rejected() {
    for raw in [0b0010_0000u8, 0b0100_0000, 0b1000_0000] {
        let flags = EventFlags::from_bits_retain(raw);
        let e = entry(flags, 0, Limit::new(0, 0), Limit::new(0, 0));
        assert!(validate_config(&[e]).is_err(), "raw={raw:#010b} should be rejected");
    }
}

#[test]
fn time_flag_and_duration_must_agree_in_both_directions() {
    let with_flag_no_duration = entry(EventFlags::TIME, 0, Limit::new(0, 0), Limit::new(0, 0));
    assert!(validate_config(&[with_flag_no_duration]).is_err());

    let without_flag_with_duration =
        entry(EventFlags::NONE, 30, Limit::new(0, 0), Limit::new(0, 0));
    assert!(validate_config(&[without_flag_with_duration]).is_err());

    let with_flag_and_duration = entry(EventFlags::TIME, 30, Limit::new(0, 0), Limit::new(0, 0));
    assert!(validate_config(&[with_flag_and_duration]).is_ok());
}

#[test]
fn threshold_ordering_compares_lexicographically_by_integer_then_decimal() {
    let equal_integer_ascending_decimal = entry(
        EventFlags::UPPER_THRESHOLD,
        0,
        Limit::new(5, 100),
        Limit::new(5, 200),
    );
    assert!(validate_config(&[equal_integer_ascending_decimal]).is_ok());

    let equal_integer_non_ascending_decimal = entry(
        EventFlags::UPPER_THRESHOLD,
        0,
        Limit::new(5, 200),
        Limit::new(5, 200),
    );
    assert!(validate_config(&[equal_integer_non_ascending_decimal]).is_err());

    let lower_integer_wins_regardless_of_decimal = entry(
        EventFlags::LOWER_THRESHOLD,
        0,
        Limit::new(5, 999),
        Limit::new(6, 0),
    );
    assert!(validate_config(&[lower_integer_wins_regardless_of_decimal]).is_ok());
}
