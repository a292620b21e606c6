// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod backend_validation_tests;
mod shop_tests;

use brew_roster::{CellEditPlan, ShiftMutation};
use brew_roster_domain::{CellIntent, ShortCode, Shop, Worker};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use crate::Persistence;

pub fn test_now() -> OffsetDateTime {
    datetime!(2024-03-01 09:00 UTC)
}

pub fn create_shop(persistence: &mut Persistence, name: &str, code: &str, minimum: u32) -> Shop {
    persistence
        .create_shop(&Shop::new(name, ShortCode::new(code).unwrap(), minimum))
        .unwrap()
}

/// Seeds Central (`CEN`, minimum 4) and Harbor (`HRB`, minimum 2).
pub fn seed_shops(persistence: &mut Persistence) -> (Shop, Shop) {
    let central = create_shop(persistence, "Central", "CEN", 4);
    let harbor = create_shop(persistence, "Harbor", "HRB", 2);
    (central, harbor)
}

pub fn create_worker(persistence: &mut Persistence, name: &str, home_shop_id: Option<i64>) -> Worker {
    let mut worker = Worker::new(name.to_string(), None);
    worker.home_shop_id = home_shop_id;
    let worker_id = persistence.create_worker(&worker).unwrap();
    persistence.get_worker(worker_id).unwrap()
}

/// Builds a cell-edit plan directly, skipping parsing and authorization.
pub fn plan(worker: &Worker, shop: &Shop, date: Date, intent: CellIntent) -> CellEditPlan {
    let mutation = intent
        .shift_kind()
        .map_or(ShiftMutation::Clear, ShiftMutation::Upsert);

    CellEditPlan {
        worker_id: worker.worker_id().unwrap(),
        shop_id: shop.shop_id().unwrap(),
        date,
        intent,
        mutation,
    }
}
