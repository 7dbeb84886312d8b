//! Integration tests for the `cart` command.
//!
//! These drive the command layer end to end against an in-memory store and
//! the fake ordering API, checking exact output.

use dough_cli::CommandError;
use dough_cli::commands::cart::{self, AddArgs, CartAction, CartArgs};
use dough_core::{CartError, CartRepository, CatalogError, KeyValueStore, MemoryStore};
use dough_integration_tests::FakeOrderingApi;

const TEST_ORDER: &str = "testorder\n  products: \n    Medium (12\") Hand Tossed MeatZZa™\n      code:     12SCMEATZA\n      options:  map[]\n      quantity: 1\n  storeID: 4336\n  method:  Carryout\n  address: 1600 Pennsylvania Ave NW\n           Washington DC, 20500\n";

const PRICED_ORDER: &str = "testorder\n  price: $34.07\n  products: \n    Medium (12\") Hand Tossed MeatZZa™\n      code:     12SCMEATZA\n      options:  map[]\n      quantity: 1\n    8-Piece Boneless Chicken\n      code:     W08PBNLW\n      options:  map[]\n      quantity: 1\n    8-piece Plain Wings\n      code:     W08PPLNW\n      options:  map[]\n      quantity: 1\n  storeID: 4336\n  method:  Carryout\n  address: 1600 Pennsylvania Ave NW\n           Washington DC, 20500\n";

fn names(names: &[&str]) -> CartArgs {
    CartArgs {
        names: names.iter().map(ToString::to_string).collect(),
        ..CartArgs::default()
    }
}

fn create_args(name: &str, products: &[&str]) -> CartArgs {
    CartArgs {
        action: Some(CartAction::Add(AddArgs {
            name_flag: Some(name.to_owned()),
            products: products.iter().map(ToString::to_string).collect(),
            ..AddArgs::default()
        })),
        ..CartArgs::default()
    }
}

async fn run(
    args: CartArgs,
    cart: &mut CartRepository<MemoryStore>,
    api: &FakeOrderingApi,
) -> (Result<(), CommandError>, String) {
    let mut out = Vec::new();
    let result = cart::run(args, cart, api, &mut out).await;
    (result, String::from_utf8(out).expect("utf-8 output"))
}

// =============================================================================
// Full workflow
// =============================================================================

#[tokio::test]
async fn test_cart_workflow() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());

    // create is silent
    let (result, out) = run(create_args("testorder", &["12SCMEATZA"]), &mut cart, &api).await;
    result.expect("create");
    assert_eq!(out, "");

    // show
    let (result, out) = run(names(&["testorder"]), &mut cart, &api).await;
    result.expect("show");
    assert_eq!(out, TEST_ORDER);

    // list
    let (result, out) = run(names(&[]), &mut cart, &api).await;
    result.expect("list");
    assert_eq!(out, "Your Orders:\n  testorder\n");

    // add products
    let args = CartArgs {
        add: vec!["W08PBNLW".to_owned(), "W08PPLNW".to_owned()],
        ..names(&["testorder"])
    };
    let (result, out) = run(args, &mut cart, &api).await;
    result.expect("add");
    assert_eq!(out, "updated order successfully saved.\n");

    // show with price
    let args = CartArgs {
        price: true,
        ..names(&["testorder"])
    };
    let (result, out) = run(args, &mut cart, &api).await;
    result.expect("price");
    assert_eq!(out, PRICED_ORDER);

    // too many names
    let (result, out) = run(names(&["to-many", "args"]), &mut cart, &api).await;
    assert!(result.expect_err("multiple names").is_user_input());
    assert_eq!(out, "");

    // delete
    let args = CartArgs {
        delete: true,
        ..names(&["testorder"])
    };
    let (result, out) = run(args, &mut cart, &api).await;
    result.expect("delete");
    assert_eq!(out, "testorder successfully deleted.\n");

    // list again
    let (result, out) = run(names(&[]), &mut cart, &api).await;
    result.expect("list");
    assert_eq!(out, "No orders saved.\n");

    // missing order
    let (result, _) = run(names(&["not_a_real_order"]), &mut cart, &api).await;
    assert!(matches!(
        result,
        Err(CommandError::Cart(CartError::NotFound(_)))
    ));
}

// =============================================================================
// Creating orders
// =============================================================================

#[tokio::test]
async fn test_create_with_positional_name() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    let args = CartArgs {
        action: Some(CartAction::Add(AddArgs {
            name: Some("testing".to_owned()),
            ..AddArgs::default()
        })),
        ..CartArgs::default()
    };

    let (result, out) = run(args, &mut cart, &api).await;
    result.expect("create");
    assert_eq!(out, "");

    let order = cart.load("testing").expect("saved");
    assert!(order.is_empty());
    assert_eq!(order.store_id, "4336");
}

#[tokio::test]
async fn test_create_flag_name_wins() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    let args = CartArgs {
        action: Some(CartAction::Add(AddArgs {
            name: Some("positional".to_owned()),
            name_flag: Some("flagged".to_owned()),
            products: Vec::new(),
        })),
        ..CartArgs::default()
    };

    run(args, &mut cart, &api).await.0.expect("create");
    assert_eq!(cart.list_all().expect("list"), ["flagged"]);
}

#[tokio::test]
async fn test_create_without_name() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    let args = CartArgs {
        action: Some(CartAction::Add(AddArgs::default())),
        ..CartArgs::default()
    };

    let (result, _) = run(args, &mut cart, &api).await;
    assert!(result.expect_err("no name").is_user_input());
    assert!(cart.store().is_empty());
}

#[tokio::test]
async fn test_create_with_unknown_product_saves_nothing() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());

    let (result, _) = run(
        create_args("dinner", &["12SCMEATZA", "NOTAPIZZA"]),
        &mut cart,
        &api,
    )
    .await;
    assert!(matches!(
        result,
        Err(CommandError::Cart(CartError::Catalog(CatalogError::ProductNotFound(code)))) if code == "NOTAPIZZA"
    ));
    assert!(cart.list_all().expect("list").is_empty());
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_reserved_name_rejected_before_storage() {
    let api = FakeOrderingApi::default();
    let mut store = MemoryStore::new();
    store.put("user_order_add", b"{not json").expect("put");
    let mut cart = CartRepository::new(store);

    // the stored value is garbage, so reaching the store would fail differently
    let (result, out) = run(names(&["add"]), &mut cart, &api).await;
    let err = result.expect_err("reserved name");
    assert!(err.is_user_input());
    assert_eq!(err.to_string(), "cannot use 'add' as an order name");
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_failed_price_writes_nothing() {
    let api = FakeOrderingApi::without_pricing();
    let mut cart = CartRepository::new(MemoryStore::new());
    run(create_args("testorder", &["12SCMEATZA"]), &mut cart, &api)
        .await
        .0
        .expect("create");

    let args = CartArgs {
        price: true,
        ..names(&["testorder"])
    };
    let (result, out) = run(args, &mut cart, &api).await;
    assert!(matches!(
        result,
        Err(CommandError::Cart(CartError::Catalog(CatalogError::Request(_))))
    ));
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_failed_add_leaves_order_unchanged() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    run(create_args("testorder", &["12SCMEATZA"]), &mut cart, &api)
        .await
        .0
        .expect("create");
    let before = cart.load("testorder").expect("load");

    let args = CartArgs {
        add: vec!["W08PBNLW".to_owned(), "BOGUS".to_owned()],
        ..names(&["testorder"])
    };
    let (result, out) = run(args, &mut cart, &api).await;
    assert!(result.is_err());
    assert_eq!(out, "");
    assert_eq!(cart.load("testorder").expect("load"), before);
}

#[tokio::test]
async fn test_delete_missing_order() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    let args = CartArgs {
        delete: true,
        ..names(&["ghost"])
    };

    let (result, out) = run(args, &mut cart, &api).await;
    assert!(matches!(
        result,
        Err(CommandError::Cart(CartError::NotFound(name))) if name == "ghost"
    ));
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_duplicate_codes_append() {
    let api = FakeOrderingApi::default();
    let mut cart = CartRepository::new(MemoryStore::new());
    run(
        create_args("wings", &["W08PPLNW", "W08PPLNW"]),
        &mut cart,
        &api,
    )
    .await
    .0
    .expect("create");

    let order = cart.load("wings").expect("load");
    assert_eq!(order.products.len(), 2);
    assert!(order.products.iter().all(|p| p.quantity == 1));
}
