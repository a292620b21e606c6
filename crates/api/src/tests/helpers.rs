// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.
//!
//! Every fixture starts from an empty in-memory database with one super
//! admin (`root`) and two shops: Central (`CEN`, staffing target 4) and
//! Harbor (`HRB`, staffing target 2).

use brew_roster_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    ApiError, AuthenticatedActor, CellEditRequest, CellEditResponse, CreateFirstAdminRequest,
    CreateShopRequest, LoginRequest, RegisterWorkerRequest, RosterSettings, ShopInfo, WorkerInfo,
    apply_cell_edit, authenticate, create_first_admin, create_shop, login, register_worker,
};

pub const PASSWORD: &str = "Espresso42x";

pub fn test_now() -> OffsetDateTime {
    datetime!(2024-03-10 12:00 UTC)
}

pub struct Fixture {
    pub persistence: Persistence,
    pub settings: RosterSettings,
    pub root: AuthenticatedActor,
    pub central: ShopInfo,
    pub harbor: ShopInfo,
}

pub fn setup() -> Fixture {
    let mut persistence = Persistence::new_in_memory().unwrap();

    create_first_admin(
        &mut persistence,
        &CreateFirstAdminRequest {
            login_name: String::from("root"),
            display_name: String::from("Roaster Root"),
            password: String::from(PASSWORD),
            password_confirmation: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();
    let root = login_as(&mut persistence, "root");
    let settings = RosterSettings::default();

    let central = create_shop(
        &mut persistence,
        &settings,
        &root,
        &CreateShopRequest {
            name: String::from("Central"),
            short_code: String::from("CEN"),
            minimum_workers: None,
        },
    )
    .unwrap();
    let harbor = create_shop(
        &mut persistence,
        &settings,
        &root,
        &CreateShopRequest {
            name: String::from("Harbor"),
            short_code: String::from("HRB"),
            minimum_workers: Some(2),
        },
    )
    .unwrap();

    Fixture {
        persistence,
        settings,
        root,
        central,
        harbor,
    }
}

pub fn login_as(persistence: &mut Persistence, login_name: &str) -> AuthenticatedActor {
    let session = login(
        persistence,
        &LoginRequest {
            login_name: String::from(login_name),
            password: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();
    authenticate(persistence, &session.session_token, test_now()).unwrap()
}

impl Fixture {
    /// Registers a worker in `shop_id` as root and logs them in.
    pub fn hire(
        &mut self,
        shop_id: i64,
        login_name: &str,
        experience_start: Option<&str>,
    ) -> (WorkerInfo, AuthenticatedActor) {
        let worker = register_worker(
            &mut self.persistence,
            &self.settings,
            &self.root,
            &RegisterWorkerRequest {
                shop_id,
                name: login_name.to_uppercase(),
                contact: Some(format!("{login_name}@example.com")),
                experience_start: experience_start.map(String::from),
                login_name: String::from(login_name),
                password: String::from(PASSWORD),
                password_confirmation: String::from(PASSWORD),
            },
            test_now(),
        )
        .unwrap();
        let actor = login_as(&mut self.persistence, login_name);
        (worker, actor)
    }

    pub fn edit(
        &mut self,
        actor: &AuthenticatedActor,
        worker_id: i64,
        shop_id: i64,
        date: &str,
        value: &str,
    ) -> Result<CellEditResponse, ApiError> {
        apply_cell_edit(
            &mut self.persistence,
            &self.settings,
            actor,
            &CellEditRequest {
                worker_id,
                shop_id,
                date: String::from(date),
                value: String::from(value),
            },
        )
    }

    /// Edits a cell as root, panicking on failure.
    pub fn root_edit(&mut self, worker_id: i64, shop_id: i64, date: &str, value: &str) {
        let root = self.root.clone();
        self.edit(&root, worker_id, shop_id, date, value).unwrap();
    }
}
