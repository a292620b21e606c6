// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidTime {
        input: String::from("25:00"),
    };
    assert_eq!(format!("{err}"), "'25:00' is not a valid HH:MM start time");

    let err: DomainError = DomainError::UnknownToken {
        token: String::from("ABC"),
    };
    assert_eq!(
        format!("{err}"),
        "'ABC' is neither a time, '+', nor a known shop code"
    );

    let err: DomainError = DomainError::DuplicateShortCode(String::from("CEN"));
    assert_eq!(
        format!("{err}"),
        "Short code 'CEN' is already used by another shop"
    );

    let err: DomainError = DomainError::InvalidMonth {
        year: 2024,
        month: 13,
    };
    assert_eq!(format!("{err}"), "2024-13 is not a valid calendar month");

    let err: DomainError = DomainError::InvalidStatusTransition {
        from: String::from("approved"),
        to: String::from("rejected"),
        reason: String::from("request is already resolved"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot move shift request from approved to rejected: request is already resolved"
    );

    let err: DomainError = DomainError::InvalidShopName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid shop name: test");

    let err: DomainError = DomainError::InvalidTimezone(String::from("Mars/Olympus"));
    assert_eq!(format!("{err}"), "Unknown timezone: Mars/Olympus");
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidRole(String::from("X")));
    assert_eq!(err.to_string(), "Invalid role: X");
}
