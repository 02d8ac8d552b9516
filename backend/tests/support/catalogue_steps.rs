//! Steps shared by the catalogue behaviour suites.

use recipe_catalogue::domain::Role;
use rstest_bdd_macros::{given, then};

use crate::catalogue_world::CatalogueWorld;

#[given("an administrator is signed in")]
fn an_administrator_is_signed_in(world: &CatalogueWorld) {
    world.sign_in("admin", Role::Admin);
}

#[given("the category {name} exists")]
fn the_category_exists(world: &CatalogueWorld, name: String) {
    world.create_category(&name);
}

#[given("the recipe {title} is filed under {category}")]
fn the_recipe_is_filed_under(world: &CatalogueWorld, title: String, category: String) {
    world.create_recipe(&title, Some(&category));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &CatalogueWorld, status: u16) {
    assert_eq!(world.status(), status, "body: {}", world.text());
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &CatalogueWorld, code: String) {
    assert_eq!(world.json()["code"], code.as_str());
}

#[then("the forbidden reason is {reason}")]
fn the_forbidden_reason_is(world: &CatalogueWorld, reason: String) {
    let body = world.json();
    assert_eq!(body["code"], "forbidden");
    assert_eq!(body["details"]["reason"], reason.as_str());
}
