//! Integration tests for the order record's external representation.

use common::OrderId;
use domain::{CustomerId, NewOrder, Order, OrderError, OrderEvent, OrderState, ProductId};
use rust_decimal_macros::dec;

fn sample_order() -> Order {
    let new_order = NewOrder::new(CustomerId::new(12), ProductId::new(34), 3, dec!(59.90)).unwrap();
    Order::from_new(OrderId::new(), &new_order)
}

#[test]
fn test_order_json_uses_camel_case_and_state_names() {
    let order = sample_order();

    let json = serde_json::to_value(&order).unwrap();

    assert_eq!(json["id"], order.id.to_string());
    assert_eq!(json["customerId"], 12);
    assert_eq!(json["productId"], 34);
    assert_eq!(json["quantity"], 3);
    assert_eq!(json["status"], "ORDER_CREATED");
    assert!(json["createdAt"].is_string());
    assert!(json["updatedAt"].is_string());
}

#[test]
fn test_order_json_roundtrip_keeps_exact_amount() {
    let mut order = sample_order();
    order.set_status(OrderState::PaymentPending);

    let json = serde_json::to_string(&order).unwrap();
    let parsed: Order = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, order);
    assert_eq!(parsed.amount, dec!(59.90));
}

#[test]
fn test_state_and_event_names_parse_back() {
    for state in OrderState::ALL {
        assert_eq!(state.as_str().parse::<OrderState>().unwrap(), state);
    }
    for event in OrderEvent::ALL {
        assert_eq!(event.as_str().parse::<OrderEvent>().unwrap(), event);
    }
    assert!("SHIPPED".parse::<OrderState>().is_err());
}

#[test]
fn test_validation_rejects_before_any_record_exists() {
    assert_eq!(
        NewOrder::new(CustomerId::new(1), ProductId::new(1), 0, dec!(1)).unwrap_err(),
        OrderError::InvalidQuantity { quantity: 0 }
    );
    assert_eq!(
        NewOrder::new(CustomerId::new(1), ProductId::new(1), 1, dec!(-0.01)).unwrap_err(),
        OrderError::InvalidAmount {
            amount: dec!(-0.01)
        }
    );
    assert!(NewOrder::new(CustomerId::new(1), ProductId::new(1), 1, dec!(0)).is_ok());
}
