// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CellParser, DomainError, ShortCode, Shop, Slug, Worker, validate_minimum_workers,
    validate_short_code_addressable, validate_short_code_unique, validate_shop_fields,
    validate_worker_fields,
};

fn create_test_shop(shop_id: i64, code: &str) -> Shop {
    Shop::with_id(
        shop_id,
        format!("Shop {code}"),
        ShortCode::new(code).unwrap(),
        Slug::from_name(code),
        4,
    )
}

#[test]
fn test_validate_shop_fields_accepts_valid_shop() {
    let shop = Shop::new("Central", ShortCode::new("CEN").unwrap(), 4);
    assert!(validate_shop_fields(&shop).is_ok());
}

#[test]
fn test_validate_shop_fields_rejects_blank_name() {
    let shop = Shop::new("   ", ShortCode::new("CEN").unwrap(), 4);
    assert!(matches!(
        validate_shop_fields(&shop),
        Err(DomainError::InvalidShopName(_))
    ));
}

#[test]
fn test_validate_shop_fields_rejects_large_target() {
    let shop = Shop::new("Central", ShortCode::new("CEN").unwrap(), 101);
    assert!(matches!(
        validate_shop_fields(&shop),
        Err(DomainError::InvalidMinimumWorkers(101))
    ));
}

#[test]
fn test_validate_minimum_workers_range() {
    assert_eq!(validate_minimum_workers(0), Ok(0));
    assert_eq!(validate_minimum_workers(100), Ok(100));
    assert!(validate_minimum_workers(-1).is_err());
    assert!(validate_minimum_workers(101).is_err());
}

#[test]
fn test_validate_worker_fields() {
    assert!(validate_worker_fields(&Worker::new(String::from("Ana"), None)).is_ok());
    assert!(matches!(
        validate_worker_fields(&Worker::new(String::new(), None)),
        Err(DomainError::InvalidWorkerName(_))
    ));
}

#[test]
fn test_validate_short_code_unique() {
    let shops = vec![create_test_shop(1, "CEN"), create_test_shop(2, "HRB")];

    let fresh = ShortCode::new("NP").unwrap();
    assert!(validate_short_code_unique(&fresh, &shops, None).is_ok());

    let taken = ShortCode::new("CEN").unwrap();
    assert!(matches!(
        validate_short_code_unique(&taken, &shops, None),
        Err(DomainError::DuplicateShortCode(code)) if code == "CEN"
    ));

    assert!(validate_short_code_unique(&taken, &shops, Some(1)).is_ok());
}

#[test]
fn test_short_code_uniqueness_is_case_sensitive() {
    let shops = vec![create_test_shop(1, "CEN")];
    let lower = ShortCode::new("cen").unwrap();

    assert!(validate_short_code_unique(&lower, &shops, None).is_ok());
}

#[test]
fn test_short_codes_claimed_by_cell_syntax_rejected() {
    let parser = CellParser::default();

    for code in ["+", "off", "OFF", "-", "вых", "9.5", "1:00"] {
        let short_code = ShortCode::new(code).unwrap();
        assert!(
            matches!(
                validate_short_code_addressable(&short_code, &parser),
                Err(DomainError::InvalidShortCode { .. })
            ),
            "{code} should be rejected"
        );
    }

    for code in ["CEN", "A.1", "x9:00", "5"] {
        let short_code = ShortCode::new(code).unwrap();
        assert!(validate_short_code_addressable(&short_code, &parser).is_ok());
    }
}

#[test]
fn test_configured_off_words_reserve_short_codes() {
    let parser = CellParser::new(["free"]);

    assert!(validate_short_code_addressable(&ShortCode::new("FREE").unwrap(), &parser).is_err());
    assert!(validate_short_code_addressable(&ShortCode::new("off").unwrap(), &parser).is_ok());
}
