// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use brew_roster_domain::{Scope, Shift, ShiftKind, ShiftRequest, ShortCode, Shop, Slug, Worker};
use std::collections::BTreeSet;
use time::macros::datetime;
use time::{Date, OffsetDateTime};

pub const CENTRAL: i64 = 1;
pub const HARBOR: i64 = 2;

pub fn create_test_shop(shop_id: i64, name: &str, code: &str, minimum_workers: u32) -> Shop {
    Shop::with_id(
        shop_id,
        name.to_string(),
        ShortCode::new(code).unwrap(),
        Slug::from_name(name),
        minimum_workers,
    )
}

pub fn create_test_shops() -> Vec<Shop> {
    vec![
        create_test_shop(CENTRAL, "Central", "CEN", 4),
        create_test_shop(HARBOR, "Harbor", "HRB", 2),
    ]
}

pub fn create_test_worker(worker_id: i64, name: &str, home_shop_id: Option<i64>) -> Worker {
    let mut worker = Worker::new(name.to_string(), None).with_id(worker_id);
    worker.home_shop_id = home_shop_id;
    worker
}

pub fn create_test_shift(shift_id: i64, worker_id: i64, shop_id: i64, date: Date) -> Shift {
    Shift::new(worker_id, shop_id, date, ShiftKind::Overtime).with_id(shift_id)
}

pub fn create_test_request(request_id: i64, shift_id: i64, offered_by: i64) -> ShiftRequest {
    ShiftRequest::new(shift_id, offered_by, String::from("dentist"), test_now()).with_id(request_id)
}

pub fn shop_admin_of(shop_ids: &[i64]) -> Scope {
    Scope::ShopAdmin {
        shop_ids: shop_ids.iter().copied().collect::<BTreeSet<i64>>(),
    }
}

pub const fn worker_scope(worker_id: i64) -> Scope {
    Scope::Worker { worker_id }
}

pub const fn test_now() -> OffsetDateTime {
    datetime!(2024-03-01 09:00 UTC)
}
