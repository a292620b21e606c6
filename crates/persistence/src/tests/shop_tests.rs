// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use brew_roster_domain::{CellIntent, ShortCode, Shop};
use time::macros::date;

use super::{create_shop, create_worker, plan, seed_shops};
use crate::{Persistence, PersistenceError};

#[test]
fn test_create_shop_assigns_id_and_slug() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let shop = create_shop(&mut persistence, "Central Station", "CEN", 4);

    assert!(shop.shop_id().is_some());
    assert_eq!(shop.slug.value(), "central-station");
    assert_eq!(persistence.get_shop(shop.shop_id().unwrap()).unwrap(), shop);
    assert_eq!(
        persistence.get_shop_by_slug("central-station").unwrap(),
        shop
    );
}

#[test]
fn test_duplicate_names_get_suffixed_slugs() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let first = create_shop(&mut persistence, "Harbor", "HRB", 2);
    let second = create_shop(&mut persistence, "Harbor", "HB2", 2);
    let third = create_shop(&mut persistence, "harbor!", "HB3", 2);

    assert_eq!(first.slug.value(), "harbor");
    assert_eq!(second.slug.value(), "harbor-2");
    assert_eq!(third.slug.value(), "harbor-3");
}

#[test]
fn test_duplicate_short_code_is_unique_violation() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_shop(&mut persistence, "Central", "CEN", 4);

    let result = persistence.create_shop(&Shop::new("Centre", ShortCode::new("CEN").unwrap(), 4));

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_list_shops_orders_by_name() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_shop(&mut persistence, "Harbor", "HRB", 2);
    create_shop(&mut persistence, "Central", "CEN", 4);

    let names: Vec<String> = persistence
        .list_shops()
        .unwrap()
        .into_iter()
        .map(|shop| shop.name)
        .collect();

    assert_eq!(names, vec!["Central", "Harbor"]);
}

#[test]
fn test_update_shop_keeps_slug() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut shop = create_shop(&mut persistence, "Central", "CEN", 4);

    shop.name = String::from("Central Plaza");
    shop.minimum_workers = 6;
    persistence.update_shop(&shop).unwrap();

    let stored = persistence.get_shop(shop.shop_id().unwrap()).unwrap();
    assert_eq!(stored.name, "Central Plaza");
    assert_eq!(stored.minimum_workers, 6);
    assert_eq!(stored.slug.value(), "central");
}

#[test]
fn test_missing_shop_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    assert!(matches!(
        persistence.get_shop(999),
        Err(PersistenceError::ShopNotFound(_))
    ));
    assert!(matches!(
        persistence.get_shop_by_slug("nowhere"),
        Err(PersistenceError::ShopNotFound(_))
    ));
    assert!(matches!(
        persistence.delete_shop(999),
        Err(PersistenceError::ShopNotFound(_))
    ));
}

#[test]
fn test_delete_unreferenced_shop() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_shop(&mut persistence, "Central", "CEN", 4);

    persistence.delete_shop(shop.shop_id().unwrap()).unwrap();

    assert!(persistence.list_shops().unwrap().is_empty());
}

#[test]
fn test_delete_shop_blocked_by_home_worker() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (central, _) = seed_shops(&mut persistence);
    create_worker(&mut persistence, "Ana", central.shop_id());

    let result = persistence.delete_shop(central.shop_id().unwrap());

    assert_eq!(
        result,
        Err(PersistenceError::ShopReferenced {
            shop_id: central.shop_id().unwrap()
        })
    );
}

#[test]
fn test_delete_shop_blocked_by_loan_target() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (central, harbor) = seed_shops(&mut persistence);
    let ana = create_worker(&mut persistence, "Ana", central.shop_id());

    persistence
        .apply_shift_mutation(&plan(
            &ana,
            &central,
            date!(2024 - 03 - 05),
            CellIntent::Loaned(harbor.clone()),
        ))
        .unwrap();

    assert!(matches!(
        persistence.delete_shop(harbor.shop_id().unwrap()),
        Err(PersistenceError::ShopReferenced { .. })
    ));
}
