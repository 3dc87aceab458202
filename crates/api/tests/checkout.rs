//! Checkout and order lifecycle tests at the service layer.

#![allow(clippy::unwrap_used)]

mod common;

use clementine_api::db::{
    CancelOutcome, OrderLine, OrderRepository, ProductPatch, ProductRepository, RepositoryError,
};
use clementine_api::services::checkout::{CartLine, CheckoutError, CheckoutRequest, CheckoutService};
use clementine_core::{OrderStatus, PaymentMethod, PaymentStatus, Price, ProductId};

fn cart(lines: &[(ProductId, u32)]) -> CheckoutRequest {
    CheckoutRequest {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| CartLine {
                product_id,
                quantity,
            })
            .collect(),
        payment_method: PaymentMethod::Card,
    }
}

// ============================================================================
// Placement
// ============================================================================

#[tokio::test]
async fn test_checkout_totals_and_decrements_stock() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;
    let gadget = common::seed_product(&state, "Gadget", 5_00, 4).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 2), (gadget.id, 3)]))
        .await
        .expect("checkout should succeed");

    // 2 * 19.99 + 3 * 5.00
    assert_eq!(placed.order.total_amount.as_cents(), 54_98);
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.payment_status, PaymentStatus::Paid);
    assert_eq!(placed.items.len(), 2);

    let products = ProductRepository::new(state.pool());
    let widget_after = products.get(widget.id).await.unwrap().unwrap();
    let gadget_after = products.get(gadget.id).await.unwrap().unwrap();
    assert_eq!(widget_after.stock, 8);
    assert_eq!(gadget_after.stock, 1);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let err = service
        .place_order(user_id, &cart(&[]))
        .await
        .expect_err("empty cart must fail");
    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[tokio::test]
async fn test_checkout_rejects_zero_quantity() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let err = service
        .place_order(user_id, &cart(&[(widget.id, 0)]))
        .await
        .expect_err("zero quantity must fail");
    assert!(matches!(err, CheckoutError::ZeroQuantity));
}

#[tokio::test]
async fn test_checkout_rejects_unknown_product() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let err = service
        .place_order(user_id, &cart(&[(ProductId::new(404), 1)]))
        .await
        .expect_err("unknown product must fail");
    assert!(matches!(err, CheckoutError::ProductNotFound(_)));
}

#[tokio::test]
async fn test_checkout_insufficient_stock_writes_nothing() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;
    let scarce = common::seed_product(&state, "Scarce", 99_99, 1).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let err = service
        .place_order(user_id, &cart(&[(widget.id, 1), (scarce.id, 2)]))
        .await
        .expect_err("oversell must fail");
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // Nothing was written: stock untouched, no orders.
    let products = ProductRepository::new(state.pool());
    assert_eq!(products.get(widget.id).await.unwrap().unwrap().stock, 10);
    assert_eq!(products.get(scarce.id).await.unwrap().unwrap().stock, 1);
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_checkout_snapshots_unit_price() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 1)]))
        .await
        .expect("checkout should succeed");

    // Reprice the product after the sale.
    ProductRepository::new(state.pool())
        .update(
            widget.id,
            &ProductPatch {
                price: Some(Price::from_cents(89_99).unwrap()),
                ..ProductPatch::default()
            },
        )
        .await
        .expect("reprice");

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.total_amount.as_cents(), 19_99);
    assert_eq!(orders[0].items[0].price.as_cents(), 19_99);
    assert_eq!(placed.items[0].price.as_cents(), 19_99);
}

#[tokio::test]
async fn test_order_cancel_reorder_scenario() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let product = common::seed_product(&state, "Widget", 10_00, 5).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let products = ProductRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());

    // First order takes 3 of 5.
    let first = service
        .place_order(user_id, &cart(&[(product.id, 3)]))
        .await
        .expect("first order");
    assert_eq!(first.order.total_amount.as_cents(), 30_00);
    assert_eq!(products.get(product.id).await.unwrap().unwrap().stock, 2);

    // A second order for 3 cannot be filled from the remaining 2.
    let err = service
        .place_order(user_id, &cart(&[(product.id, 3)]))
        .await
        .expect_err("second order oversells");
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    assert_eq!(products.get(product.id).await.unwrap().unwrap().stock, 2);

    // Cancelling the first order brings stock back to 5.
    let outcome = orders.cancel(first.order.id, user_id).await.expect("cancel");
    assert!(matches!(outcome, CancelOutcome::Cancelled(_)));
    assert_eq!(products.get(product.id).await.unwrap().unwrap().stock, 5);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_restores_stock() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 4)]))
        .await
        .expect("checkout should succeed");

    let orders = OrderRepository::new(state.pool());
    let outcome = orders
        .cancel(placed.order.id, user_id)
        .await
        .expect("cancel should succeed");
    let cancelled = match outcome {
        CancelOutcome::Cancelled(order) => order,
        CancelOutcome::NotCancellable(status) => panic!("unexpected: {status}"),
    };
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let widget_after = ProductRepository::new(state.pool())
        .get(widget.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(widget_after.stock, 10);
}

#[tokio::test]
async fn test_cancel_is_not_repeatable() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 4)]))
        .await
        .expect("checkout should succeed");

    let orders = OrderRepository::new(state.pool());
    orders.cancel(placed.order.id, user_id).await.expect("first cancel");
    let second = orders
        .cancel(placed.order.id, user_id)
        .await
        .expect("second cancel resolves");
    assert!(matches!(
        second,
        CancelOutcome::NotCancellable(OrderStatus::Cancelled)
    ));

    // Restock happened exactly once.
    let widget_after = ProductRepository::new(state.pool())
        .get(widget.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(widget_after.stock, 10);
}

#[tokio::test]
async fn test_cancel_blocked_once_shipped() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 1)]))
        .await
        .expect("checkout should succeed");

    let orders = OrderRepository::new(state.pool());
    orders
        .set_status(placed.order.id, OrderStatus::Shipped)
        .await
        .expect("ship");

    let outcome = orders
        .cancel(placed.order.id, user_id)
        .await
        .expect("cancel resolves");
    assert!(matches!(
        outcome,
        CancelOutcome::NotCancellable(OrderStatus::Shipped)
    ));
    assert_eq!(
        ProductRepository::new(state.pool())
            .get(widget.id)
            .await
            .unwrap()
            .unwrap()
            .stock,
        9
    );
}

#[tokio::test]
async fn test_cancel_requires_ownership() {
    let state = common::test_state().await;
    let (owner, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let (other, _) = common::seed_customer(&state, "Bob", "bob@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(owner, &cart(&[(widget.id, 1)]))
        .await
        .expect("checkout should succeed");

    let err = OrderRepository::new(state.pool())
        .cancel(placed.order.id, other)
        .await
        .expect_err("foreign order must look missing");
    assert!(matches!(err, RepositoryError::NotFound));
}

// ============================================================================
// Commit-time stock conflicts
// ============================================================================

#[tokio::test]
async fn test_guarded_decrement_rolls_back_whole_order() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let product = common::seed_product(&state, "Widget", 10_00, 5).await;

    // A line that validated against stale stock: by the time the write
    // happens, 6 units are no longer there.
    let lines = [OrderLine {
        product_id: product.id,
        quantity: 6,
        unit_price: product.price,
    }];
    let orders = OrderRepository::new(state.pool());
    let err = orders
        .create(
            user_id,
            Price::from_cents(60_00).unwrap(),
            PaymentMethod::Card,
            &lines,
        )
        .await
        .expect_err("guarded decrement must refuse");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // The order header rolled back with the decrement.
    assert!(orders.list_for_user(user_id).await.unwrap().is_empty());
    assert_eq!(
        ProductRepository::new(state.pool())
            .get(product.id)
            .await
            .unwrap()
            .unwrap()
            .stock,
        5
    );
}

#[tokio::test]
async fn test_conflict_on_second_line_undoes_first() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 10_00, 5).await;
    let scarce = common::seed_product(&state, "Scarce", 99_99, 1).await;

    let lines = [
        OrderLine {
            product_id: widget.id,
            quantity: 2,
            unit_price: widget.price,
        },
        OrderLine {
            product_id: scarce.id,
            quantity: 3,
            unit_price: scarce.price,
        },
    ];
    let err = OrderRepository::new(state.pool())
        .create(
            user_id,
            Price::from_cents(319_97).unwrap(),
            PaymentMethod::Card,
            &lines,
        )
        .await
        .expect_err("second line must conflict");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // The first line's decrement was already applied inside the
    // transaction and must come back with the rollback.
    let products = ProductRepository::new(state.pool());
    assert_eq!(products.get(widget.id).await.unwrap().unwrap().stock, 5);
    assert_eq!(products.get(scarce.id).await.unwrap().unwrap().stock, 1);
}

#[tokio::test]
async fn test_duplicate_lines_validate_combined_quantity() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let product = common::seed_product(&state, "Widget", 10_00, 5).await;

    // Two lines of 3 against stock 5: no retry can ever satisfy this
    // cart, so it must fail validation, not the commit-time guard.
    let service = CheckoutService::new(state.pool(), state.payment());
    let err = service
        .place_order(user_id, &cart(&[(product.id, 3), (product.id, 3)]))
        .await
        .expect_err("combined quantity exceeds stock");
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    assert_eq!(
        ProductRepository::new(state.pool())
            .get(product.id)
            .await
            .unwrap()
            .unwrap()
            .stock,
        5
    );
}

#[tokio::test]
async fn test_duplicate_lines_merge_into_one_item() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let product = common::seed_product(&state, "Widget", 10_00, 5).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(product.id, 2), (product.id, 2)]))
        .await
        .expect("satisfiable cart");

    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].quantity, 4);
    assert_eq!(placed.order.total_amount.as_cents(), 40_00);
    assert_eq!(
        ProductRepository::new(state.pool())
            .get(product.id)
            .await
            .unwrap()
            .unwrap()
            .stock,
        1
    );
}

// ============================================================================
// Status transitions
// ============================================================================

#[tokio::test]
async fn test_set_status_accepts_any_transition() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 1)]))
        .await
        .expect("checkout should succeed");

    let orders = OrderRepository::new(state.pool());
    // Support staff can jump around freely, including out of terminal states.
    for status in [
        OrderStatus::Delivered,
        OrderStatus::Processing,
        OrderStatus::Cancelled,
        OrderStatus::Completed,
    ] {
        let order = orders
            .set_status(placed.order.id, status)
            .await
            .expect("status update");
        assert_eq!(order.status, status);
    }
}

#[tokio::test]
async fn test_admin_status_change_never_restocks() {
    let state = common::test_state().await;
    let (user_id, _) = common::seed_customer(&state, "Ada", "ada@example.com").await;
    let widget = common::seed_product(&state, "Widget", 19_99, 10).await;

    let service = CheckoutService::new(state.pool(), state.payment());
    let placed = service
        .place_order(user_id, &cart(&[(widget.id, 3)]))
        .await
        .expect("checkout should succeed");

    OrderRepository::new(state.pool())
        .set_status(placed.order.id, OrderStatus::Cancelled)
        .await
        .expect("status update");

    // Only the customer cancel path restores stock.
    assert_eq!(
        ProductRepository::new(state.pool())
            .get(widget.id)
            .await
            .unwrap()
            .unwrap()
            .stock,
        7
    );
}
