//! Tests for the role registry service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockIdentityStore, StoreMessages};

fn role(id: &str, name: &str) -> Role {
    Role::new(
        RoleId::new(id).expect("valid role id"),
        RoleName::new(name).expect("valid role name"),
    )
}

fn role_id(raw: &str) -> RoleId {
    RoleId::new(raw).expect("valid role id")
}

fn make_service(store: MockIdentityStore) -> RoleRegistryService<MockIdentityStore> {
    RoleRegistryService::new(Arc::new(store))
}

#[fixture]
fn admins() -> Role {
    role("role-admins", "Admins")
}

#[tokio::test]
async fn list_roles_orders_by_name() {
    let mut store = MockIdentityStore::new();
    store.expect_list_roles().times(1).return_once(|| {
        Ok(vec![
            role("r3", "users"),
            role("r1", "Admins"),
            role("r2", "managers"),
        ])
    });

    let roles = make_service(store).list_roles().await.expect("roles listed");
    let names: Vec<&str> = roles.iter().map(|r| r.name().as_ref()).collect();
    assert_eq!(names, ["Admins", "managers", "users"]);
}

#[tokio::test]
async fn list_roles_maps_connection_failure_to_unavailable() {
    let mut store = MockIdentityStore::new();
    store
        .expect_list_roles()
        .return_once(|| Err(IdentityStoreError::connection("refused")));

    let error = make_service(store).list_roles().await.expect_err("unavailable");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t")]
#[tokio::test]
async fn create_role_rejects_blank_names_without_store_calls(#[case] name: &str) {
    let mut store = MockIdentityStore::new();
    store.expect_find_role_by_name().times(0);
    store.expect_create_role().times(0);

    let error = make_service(store)
        .create_role(name)
        .await
        .expect_err("validation error");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_role_rejects_duplicates_without_creating(admins: Role) {
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_name()
        .withf(|name: &RoleName| name.as_ref() == "admins")
        .times(1)
        .return_once(move |_| Ok(Some(admins)));
    store.expect_create_role().times(0);

    let error = make_service(store)
        .create_role("admins")
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_role_trims_and_creates(admins: Role) {
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_name()
        .times(1)
        .return_once(|_| Ok(None));
    store
        .expect_create_role()
        .withf(|name: &RoleName| name.as_ref() == "Admins")
        .times(1)
        .return_once(move |_| Ok(admins));

    let created = make_service(store)
        .create_role("  Admins  ")
        .await
        .expect("role created");
    assert_eq!(created.id().as_ref(), "role-admins");
}

#[tokio::test]
async fn create_role_maps_store_side_duplicate_to_conflict() {
    let mut store = MockIdentityStore::new();
    store.expect_find_role_by_name().return_once(|_| Ok(None));
    store
        .expect_create_role()
        .return_once(|_| Err(IdentityStoreError::duplicate("Admins")));

    let error = make_service(store)
        .create_role("Admins")
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn delete_role_fails_with_not_found_for_unknown_id() {
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    store.expect_delete_role().times(0);

    let error = make_service(store)
        .delete_role(&role_id("missing"))
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_role_surfaces_every_store_message(admins: Role) {
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_id()
        .return_once(move |_| Ok(Some(admins)));
    store.expect_delete_role().times(1).return_once(|_| {
        Err(IdentityStoreError::rejected(StoreMessages::new([
            "role is referenced by an access policy",
            "role is marked as protected",
        ])))
    });

    let error = make_service(store)
        .delete_role(&role_id("role-admins"))
        .await
        .expect_err("store rejection");
    assert_eq!(error.code(), ErrorCode::StoreRejected);
    assert_eq!(
        error.details(),
        [
            "role is referenced by an access policy",
            "role is marked as protected"
        ]
    );
}

#[rstest]
#[tokio::test]
async fn delete_role_passes_resolved_role_to_store(admins: Role) {
    let expected = admins.clone();
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_id()
        .withf(|id: &RoleId| id.as_ref() == "role-admins")
        .return_once(move |_| Ok(Some(admins)));
    store
        .expect_delete_role()
        .withf(move |role: &Role| *role == expected)
        .times(1)
        .return_once(|_| Ok(()));

    make_service(store)
        .delete_role(&role_id("role-admins"))
        .await
        .expect("role deleted");
}

#[rstest]
#[tokio::test]
async fn find_role_returns_resolved_role(admins: Role) {
    let expected = admins.clone();
    let mut store = MockIdentityStore::new();
    store
        .expect_find_role_by_id()
        .return_once(move |_| Ok(Some(admins)));

    let found = make_service(store)
        .find_role(&role_id("role-admins"))
        .await
        .expect("role found");
    assert_eq!(found, expected);
}
