//! 结账全流程 - 从浏览目录到收据，再由管理员推进订单状态
//!
//! Runs with paused Tokio time so the simulated order latency costs nothing.

use rental_core::booking::PaymentMethod;
use rental_core::state::{DashboardSummary, OrderFilter};
use rental_core::{BookingFlow, BookingStep, ErrorCode, PortalState, ReceiptConfig, StateOptions};
use shared::models::{OrderStatus, StepState, UserRole};
use std::time::Duration;

fn portal() -> PortalState {
    PortalState::in_memory(StateOptions {
        order_latency: Duration::from_millis(1500),
        admin_password: "AJ2006".into(),
    })
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_student_checkout_then_admin_lifecycle() {
    let state = portal();
    let student = state.login("new.student@sona.edu", "New Student", UserRole::User);

    // Browse and fill the cart
    let boards = state.search_hardware("", Some("Microcontrollers"));
    assert_eq!(boards.len(), 1);
    state.add_to_cart(&boards[0]).unwrap();
    state.add_to_cart(&state.hardware_item("3").unwrap()).unwrap();
    state.add_to_cart(&state.hardware_item("2").unwrap()).unwrap();

    // Check out two of the three
    let selected = vec![boards[0].id.clone(), "3".to_string()];
    let mut flow = BookingFlow::new(state.clone(), &selected)
        .unwrap()
        .with_receipt_config(ReceiptConfig {
            origin: "https://ic.sona.edu".into(),
            qr_endpoint: "https://api.qrserver.com/v1/create-qr-code/".into(),
        });
    assert_eq!(flow.total(), 70);
    assert_eq!(flow.details().full_name, "New Student");

    flow.set_phone("98765 43210");
    flow.details_mut().college_id = "22EC017".into();
    {
        let address = flow.address_mut();
        address.set_state("Karnataka");
        address.city = "Bangalore".into();
        address.road_name = "kora".into();
        assert_eq!(address.road_suggestions(), vec!["Koramangala"]);
        address.road_name = "Koramangala".into();
        address.house_no = "12B".into();
        address.set_pincode("560034");
    }
    assert!(flow.save_address());

    flow.select_payment(PaymentMethod::PayOnCollection).unwrap();
    assert_eq!(flow.next().await.unwrap(), BookingStep::Payment);
    assert_eq!(flow.next().await.unwrap(), BookingStep::Review);
    assert_eq!(flow.next().await.unwrap(), BookingStep::Receipt);

    let receipt = flow.receipt().unwrap().clone();
    let order = receipt.order.clone();
    assert_eq!(order.user_id, student.id);
    assert_eq!(order.total_amount, 70);
    assert_eq!(order.contact, "9876543210");
    assert_eq!(order.address, "12B, Koramangala, Bangalore, Karnataka - 560034, India");
    assert_eq!(receipt.order_url, format!("https://ic.sona.edu/#/order/{}", order.id));
    assert!(receipt.qr_code_url.contains("size=150x150"));

    // Unselected item stays in the cart
    let cart: Vec<_> = state.cart().into_iter().map(|i| i.id).collect();
    assert_eq!(cart, vec!["2"]);

    assert_eq!(
        state.dashboard(),
        DashboardSummary {
            total: 1,
            active_rentals: 0,
            pending: 1,
        }
    );

    // Admin walks the order through its lifecycle
    state.admin_login("AJ2006").unwrap();
    for status in [OrderStatus::Approved, OrderStatus::Delivered] {
        state.update_order_status(&order.id, status).unwrap();
    }
    let history = state.user_history(&student.id).unwrap();
    assert_eq!(history.active_count, 1);

    let delivered = state.order(&order.id).unwrap();
    let tracker = state.order_tracker(&delivered);
    assert_eq!(tracker[3].state, StepState::Current);

    let err = state
        .update_order_status(&order.id, OrderStatus::Rejected)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    state.update_order_status(&order.id, OrderStatus::Returned).unwrap();

    // Back to the student view
    state.login("new.student@sona.edu", "ignored", UserRole::Admin);
    assert_eq!(state.current_user().unwrap().role, UserRole::User);
    assert!(state.my_orders(OrderFilter::Active, "").is_empty());
    assert_eq!(state.my_orders(OrderFilter::Completed, "arduino").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_two_checkouts_in_flight() {
    let state = portal();
    state.login("rahul@sona.edu", "Rahul Kumar", UserRole::User);
    let arduino = state.hardware_item("1").unwrap();
    let pi = state.hardware_item("2").unwrap();
    state.add_to_cart(&arduino).unwrap();
    state.add_to_cart(&pi).unwrap();

    let details = shared::models::CheckoutDetails {
        full_name: "Rahul Kumar".into(),
        email: "rahul@sona.edu".into(),
        phone: "9876543210".into(),
        address: "Hostel Block A, Salem".into(),
        college_id: "21IT101".into(),
    };

    let first = state.place_order(details.clone(), Some(vec![arduino])).unwrap();
    let second = state.place_order(details, Some(vec![pi])).unwrap();
    // Abandon the first; it still commits
    drop(first);

    let second = second.await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let orders = state.orders();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().any(|o| o.id == second.id));
    assert!(state.cart().is_empty());
}
