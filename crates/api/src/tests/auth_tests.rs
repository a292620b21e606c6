// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for login, sessions and scope resolution.

use brew_roster_domain::Scope;
use time::Duration;

use super::helpers::{PASSWORD, login_as, setup, test_now};
use crate::{
    ApiError, AssignShopAdminRequest, CreateFirstAdminRequest, LoginRequest, SelfRegisterRequest,
    assign_shop_admin, authenticate, create_first_admin, login, logout, self_register, whoami,
};

#[test]
fn test_first_admin_only_on_empty_system() {
    let mut fixture = setup();

    let result = create_first_admin(
        &mut fixture.persistence,
        &CreateFirstAdminRequest {
            login_name: String::from("second"),
            display_name: String::from("Second"),
            password: String::from(PASSWORD),
            password_confirmation: String::from(PASSWORD),
        },
        test_now(),
    );

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_first_admin_checks_password_policy() {
    let mut persistence = brew_roster_persistence::Persistence::new_in_memory().unwrap();

    let result = create_first_admin(
        &mut persistence,
        &CreateFirstAdminRequest {
            login_name: String::from("root"),
            display_name: String::from("Root"),
            password: String::from("short"),
            password_confirmation: String::from("short"),
        },
        test_now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
    assert_eq!(persistence.count_identities().unwrap(), 0);
}

#[test]
fn test_login_is_case_insensitive_and_checks_password() {
    let mut fixture = setup();

    let ok = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("  ROOT "),
            password: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();
    assert_eq!(ok.login_name, "root");
    assert_eq!(ok.expires_at, "2024-04-09T12:00:00Z");

    let wrong = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("root"),
            password: String::from("Espresso42y"),
        },
        test_now(),
    );
    assert!(matches!(wrong, Err(ApiError::AuthenticationFailed { .. })));

    let unknown = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("nobody"),
            password: String::from(PASSWORD),
        },
        test_now(),
    );
    assert!(matches!(unknown, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_session_lifecycle() {
    let mut fixture = setup();
    let session = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("root"),
            password: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();

    let actor = authenticate(&mut fixture.persistence, &session.session_token, test_now()).unwrap();
    assert_eq!(actor.scope, Scope::SuperAdmin);

    logout(&mut fixture.persistence, &session.session_token).unwrap();
    assert!(matches!(
        authenticate(&mut fixture.persistence, &session.session_token, test_now()),
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_expired_session_is_rejected_and_removed() {
    let mut fixture = setup();
    let session = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("root"),
            password: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();

    let later = test_now() + Duration::days(31);
    assert!(matches!(
        authenticate(&mut fixture.persistence, &session.session_token, later),
        Err(ApiError::AuthenticationFailed { reason }) if reason == "Session expired"
    ));
    assert!(
        fixture
            .persistence
            .get_session_by_token(&session.session_token)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_scope_resolution_for_each_role() {
    let mut fixture = setup();
    let central_id = fixture.central.shop_id;
    let (ana, _) = fixture.hire(central_id, "ana", None);

    let worker = login_as(&mut fixture.persistence, "ana");
    assert_eq!(
        worker.scope,
        Scope::Worker {
            worker_id: ana.worker_id
        }
    );
    assert!(!worker.unassigned);

    assign_shop_admin(
        &mut fixture.persistence,
        &fixture.root,
        &AssignShopAdminRequest {
            login_name: String::from("ana"),
            shop_id: central_id,
        },
    )
    .unwrap();

    let admin = login_as(&mut fixture.persistence, "ana");
    let described = whoami(&admin);
    assert_eq!(described.role, "SHOP_ADMIN");
    assert_eq!(described.shop_ids, vec![central_id]);
    assert_eq!(described.worker_id, None);
}

#[test]
fn test_self_registered_worker_is_unassigned() {
    let mut fixture = setup();

    self_register(
        &mut fixture.persistence,
        &fixture.settings,
        &SelfRegisterRequest {
            name: String::from("Noa"),
            contact: None,
            experience_start: None,
            login_name: String::from("noa"),
            password: String::from(PASSWORD),
            password_confirmation: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();

    let actor = login_as(&mut fixture.persistence, "noa");
    assert!(actor.unassigned);
    assert!(whoami(&actor).unassigned);
    assert_eq!(whoami(&actor).role, "WORKER");
}

#[test]
fn test_identity_without_worker_cannot_act() {
    let mut fixture = setup();
    fixture
        .persistence
        .create_identity("ghost", "Ghost", PASSWORD, false, test_now())
        .unwrap();

    let session = login(
        &mut fixture.persistence,
        &LoginRequest {
            login_name: String::from("ghost"),
            password: String::from(PASSWORD),
        },
        test_now(),
    )
    .unwrap();

    assert!(matches!(
        authenticate(&mut fixture.persistence, &session.session_token, test_now()),
        Err(ApiError::AuthenticationFailed { .. })
    ));
}
