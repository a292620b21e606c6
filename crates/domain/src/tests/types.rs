// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, ProfileRole, Scope, ShortCode, Shop, Slug, Worker};
use std::collections::BTreeSet;
use time::macros::date;

#[test]
fn test_short_code_accepts_printable_tokens() {
    assert_eq!(ShortCode::new("CEN").unwrap().value(), "CEN");
    assert_eq!(ShortCode::new("Ц-1").unwrap().value(), "Ц-1");
    assert!(ShortCode::new("ABCDEFGHIJ").is_ok());
}

#[test]
fn test_short_code_rejects_bad_values() {
    for raw in ["", "ABCDEFGHIJK", "A B", "A\tB", "A\u{7}"] {
        assert!(
            matches!(
                ShortCode::new(raw),
                Err(DomainError::InvalidShortCode { .. })
            ),
            "{raw:?}"
        );
    }
}

#[test]
fn test_slug_from_name() {
    assert_eq!(Slug::from_name("Central").value(), "central");
    assert_eq!(Slug::from_name("  Harbor   Side! ").value(), "harbor-side");
    assert_eq!(Slug::from_name("Café #2").value(), "café-2");
    assert_eq!(Slug::from_name("!!!").value(), Slug::FALLBACK);
}

#[test]
fn test_slug_suffix() {
    assert_eq!(Slug::from_name("Central").with_suffix(2).value(), "central-2");
}

#[test]
fn test_new_shop_derives_slug() {
    let shop = Shop::new("North Pier", ShortCode::new("NP").unwrap(), 4);

    assert_eq!(shop.slug.value(), "north-pier");
    assert_eq!(shop.shop_id(), None);
}

#[test]
fn test_worker_roster_membership() {
    let mut worker = Worker::new(String::from("Ana"), None);
    assert!(worker.is_on_roster_for(date!(2024 - 03 - 01)));
    assert!(worker.is_unassigned());

    worker.fired_at = Some(date!(2024 - 03 - 01));
    assert!(!worker.is_on_roster_for(date!(2024 - 03 - 01)));

    worker.fired_at = Some(date!(2024 - 03 - 02));
    assert!(worker.is_on_roster_for(date!(2024 - 03 - 01)));
}

#[test]
fn test_profile_role_round_trip() {
    for role in [ProfileRole::Worker, ProfileRole::ShopAdmin] {
        assert_eq!(role.as_str().parse::<ProfileRole>(), Ok(role));
    }
    assert!("ADMIN".parse::<ProfileRole>().is_err());
    assert_eq!(ProfileRole::default(), ProfileRole::Worker);
}

#[test]
fn test_scope_shop_management() {
    let super_admin = Scope::SuperAdmin;
    let shop_admin = Scope::ShopAdmin {
        shop_ids: BTreeSet::from([1, 3]),
    };
    let worker = Scope::Worker { worker_id: 5 };

    assert!(super_admin.manages_shop(42));
    assert!(shop_admin.manages_shop(3));
    assert!(!shop_admin.manages_shop(2));
    assert!(!worker.manages_shop(1));
    assert_eq!(worker.worker_id(), Some(5));
    assert_eq!(shop_admin.worker_id(), None);
}

#[test]
fn test_scope_serializes_with_role_tag() {
    let json = serde_json::to_value(Scope::Worker { worker_id: 5 }).unwrap();

    assert_eq!(json["role"], "WORKER");
    assert_eq!(json["worker_id"], 5);
}
