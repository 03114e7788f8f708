//! Four-step checkout wizard
//!
//! ```text
//! Details(1) ──► Payment(2) ──► Review(3) ──► Receipt(4)
//!     ◄──────────────┘ ◄────────────┘
//! ```
//!
//! Details validates the form, Payment needs an enabled method, Review
//! checks the details again, places the order and only moves on once it
//! has committed. Receipt is final.

use super::address::AddressForm;
use super::receipt::{Receipt, ReceiptConfig};
use super::validation::{normalize_phone, validate_details};
use crate::state::PortalState;
use serde::{Deserialize, Serialize};
use shared::models::{CheckoutDetails, HardwareItem, Order, total_price};
use shared::{AppError, AppResult, ErrorCode, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BookingStep {
    Details = 1,
    Payment = 2,
    Review = 3,
    Receipt = 4,
}

impl BookingStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStep::Details => "Details",
            BookingStep::Payment => "Payment",
            BookingStep::Review => "Confirm",
            BookingStep::Receipt => "Receipt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Pay at the lab counter when collecting
    #[default]
    PayOnCollection,
    Online,
}

impl PaymentMethod {
    /// Online payment is not offered yet
    pub fn is_enabled(&self) -> bool {
        matches!(self, PaymentMethod::PayOnCollection)
    }
}

#[derive(Debug)]
pub struct BookingFlow {
    state: PortalState,
    step: BookingStep,
    items: Vec<HardwareItem>,
    details: CheckoutDetails,
    address: AddressForm,
    payment: PaymentMethod,
    errors: FieldErrors,
    receipt_config: ReceiptConfig,
    order: Option<Order>,
    receipt: Option<Receipt>,
}

impl BookingFlow {
    /// Start a checkout for the cart entries in `selected_ids`, or for the
    /// whole cart when no ids are given.
    ///
    /// Details are prefilled from the session user.
    pub fn new(state: PortalState, selected_ids: &[String]) -> AppResult<Self> {
        let cart = state.cart();
        let items: Vec<HardwareItem> = if selected_ids.is_empty() {
            cart
        } else {
            cart.into_iter()
                .filter(|item| selected_ids.contains(&item.id))
                .collect()
        };
        if items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::EmptyOrder,
                "No items to checkout",
            ));
        }

        let details = state
            .current_user()
            .map(|user| CheckoutDetails {
                full_name: user.name,
                email: user.email,
                phone: user.phone.unwrap_or_default(),
                address: String::new(),
                college_id: user.roll_number.unwrap_or_default(),
            })
            .unwrap_or_default();

        tracing::debug!(items = items.len(), "Booking started");
        Ok(Self {
            state,
            step: BookingStep::Details,
            items,
            details,
            address: AddressForm::new(),
            payment: PaymentMethod::default(),
            errors: FieldErrors::new(),
            receipt_config: ReceiptConfig::default(),
            order: None,
            receipt: None,
        })
    }

    pub fn with_receipt_config(mut self, config: ReceiptConfig) -> Self {
        self.receipt_config = config;
        self
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn items(&self) -> &[HardwareItem] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        total_price(&self.items)
    }

    /// Messages from the last failed validation, keyed by field
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn details(&self) -> &CheckoutDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut CheckoutDetails {
        &mut self.details
    }

    /// Phone input box; keeps at most ten digits
    pub fn set_phone(&mut self, input: &str) {
        self.details.phone = normalize_phone(input);
        self.errors.remove("phone");
    }

    pub fn address(&self) -> &AddressForm {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut AddressForm {
        &mut self.address
    }

    /// Validate the address form and, if it passes, use its formatted
    /// string as the delivery address. Returns whether it was saved.
    pub fn save_address(&mut self) -> bool {
        let errors = self.address.validate();
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.details.address = self.address.format();
        self.errors.remove("address");
        true
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    pub fn select_payment(&mut self, method: PaymentMethod) -> AppResult<()> {
        if !method.is_enabled() {
            return Err(AppError::new(ErrorCode::PaymentMethodUnavailable));
        }
        self.payment = method;
        Ok(())
    }

    /// Advance one step.
    ///
    /// On Review this places the order and waits for the commit; a failed
    /// placement leaves the flow on Review so it can be retried. Details
    /// edited into an invalid state since step 1 send the flow back there.
    ///
    /// Once the order has committed the flow is on Receipt even if the
    /// receipt itself could not be built; calling `next` again only retries
    /// the receipt.
    pub async fn next(&mut self) -> AppResult<BookingStep> {
        match self.step {
            BookingStep::Details => {
                let errors = validate_details(&self.details);
                self.errors = errors.clone();
                errors.into_result()?;
                self.step = BookingStep::Payment;
            }
            BookingStep::Payment => {
                if !self.payment.is_enabled() {
                    return Err(AppError::new(ErrorCode::PaymentMethodUnavailable));
                }
                self.step = BookingStep::Review;
            }
            BookingStep::Review => {
                let errors = validate_details(&self.details);
                self.errors = errors.clone();
                if let Err(e) = errors.into_result() {
                    tracing::warn!(fields = self.errors.len(), "Booking details invalid at review");
                    self.step = BookingStep::Details;
                    return Err(e);
                }

                let pending = self
                    .state
                    .place_order(self.details.clone(), Some(self.items.clone()))?;
                let order = pending.await?;
                tracing::info!(order_id = %order.id, "Booking completed");
                self.order = Some(order);
                self.step = BookingStep::Receipt;
                self.issue_receipt()?;
            }
            BookingStep::Receipt => {
                if self.receipt.is_some() {
                    return Err(AppError::with_message(
                        ErrorCode::InvalidBookingStep,
                        "Booking is already complete",
                    ));
                }
                self.issue_receipt()?;
            }
        }
        tracing::debug!(step = self.step.number(), "Booking step advanced");
        Ok(self.step)
    }

    /// Go back one step. No effect on Details or Receipt.
    pub fn back(&mut self) -> BookingStep {
        self.step = match self.step {
            BookingStep::Payment => BookingStep::Details,
            BookingStep::Review => BookingStep::Payment,
            step => step,
        };
        self.step
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// The committed order, set as soon as Review succeeds
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    fn issue_receipt(&mut self) -> AppResult<()> {
        let Some(order) = &self.order else {
            return Err(AppError::internal("No committed order to issue a receipt for"));
        };
        match Receipt::for_order(order, &self.receipt_config) {
            Ok(receipt) => {
                self.receipt = Some(receipt);
                Ok(())
            }
            Err(e) => {
                tracing::error!(order_id = %order.id, code = %e.code, "Receipt could not be issued");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateOptions;
    use shared::models::{OrderStatus, UserRole};
    use std::time::Duration;

    fn state_with_cart() -> PortalState {
        let state = PortalState::in_memory(StateOptions {
            order_latency: Duration::from_millis(1500),
            admin_password: "AJ2006".into(),
        })
        .unwrap();
        state.login("rahul@sona.edu", "Rahul Kumar", UserRole::User);
        for id in ["1", "2", "3"] {
            let item = state.hardware_item(id).unwrap();
            state.add_to_cart(&item).unwrap();
        }
        state
    }

    fn fill_address(flow: &mut BookingFlow) {
        let address = flow.address_mut();
        address.set_state("Tamil Nadu");
        address.city = "Salem".into();
        address.set_pincode("636005");
        address.house_no = "Room 1".into();
        address.road_name = "Main Road".into();
        assert!(flow.save_address());
    }

    #[test]
    fn test_new_selects_subset_and_prefills() {
        let state = state_with_cart();
        let flow = BookingFlow::new(state, &["1".to_string(), "3".to_string()]).unwrap();

        let ids: Vec<_> = flow.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(flow.total(), 70);
        assert_eq!(flow.step(), BookingStep::Details);
        assert_eq!(flow.details().full_name, "Rahul Kumar");
        assert_eq!(flow.details().email, "rahul@sona.edu");
        assert_eq!(flow.details().college_id, "21IT101");
        assert!(flow.details().address.is_empty());
    }

    #[test]
    fn test_new_with_empty_selection_uses_whole_cart() {
        let flow = BookingFlow::new(state_with_cart(), &[]).unwrap();
        assert_eq!(flow.items().len(), 3);
        assert_eq!(flow.total(), 220);
    }

    #[test]
    fn test_new_refuses_empty_checkout() {
        let state = state_with_cart();
        state.clear_cart();
        let err = BookingFlow::new(state.clone(), &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyOrder);

        state.add_to_cart(&state.hardware_item("1").unwrap()).unwrap();
        let err = BookingFlow::new(state, &["9".to_string()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyOrder);
    }

    #[tokio::test]
    async fn test_details_block_until_valid() {
        let mut flow = BookingFlow::new(state_with_cart(), &[]).unwrap();
        flow.set_phone("12345 67890");

        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(flow.step(), BookingStep::Details);
        assert!(flow.errors().contains("phone"));
        assert!(flow.errors().contains("address"));

        flow.set_phone("98765-43210");
        assert!(!flow.errors().contains("phone"));
        fill_address(&mut flow);
        assert!(!flow.errors().contains("address"));

        assert_eq!(flow.next().await.unwrap(), BookingStep::Payment);
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_save_address_reports_form_errors() {
        let mut flow = BookingFlow::new(state_with_cart(), &[]).unwrap();
        flow.address_mut().set_state("Tamil Nadu");
        assert!(!flow.save_address());
        assert!(flow.errors().contains("city"));
        assert!(flow.details().address.is_empty());
    }

    #[test]
    fn test_online_payment_disabled() {
        let mut flow = BookingFlow::new(state_with_cart(), &[]).unwrap();
        let err = flow.select_payment(PaymentMethod::Online).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentMethodUnavailable);
        assert_eq!(flow.payment(), PaymentMethod::PayOnCollection);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_to_receipt() {
        let state = state_with_cart();
        let mut flow = BookingFlow::new(state.clone(), &["1".to_string(), "2".to_string()]).unwrap();
        flow.set_phone("9876543210");
        fill_address(&mut flow);

        assert_eq!(flow.next().await.unwrap(), BookingStep::Payment);
        assert_eq!(flow.back(), BookingStep::Details);
        assert_eq!(flow.next().await.unwrap(), BookingStep::Payment);
        assert_eq!(flow.next().await.unwrap(), BookingStep::Review);
        assert_eq!(flow.next().await.unwrap(), BookingStep::Receipt);

        let order = flow.order().unwrap().clone();
        assert_eq!(order.total_amount, 200);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.address, "Room 1, Main Road, Salem, Tamil Nadu - 636005, India");
        assert_eq!(state.orders()[0].id, order.id);

        let left: Vec<_> = state.cart().into_iter().map(|i| i.id).collect();
        assert_eq!(left, vec!["3"]);

        let receipt = flow.receipt().unwrap();
        assert!(receipt.order_url.ends_with(&format!("/#/order/{}", order.id)));

        // Receipt is final
        assert_eq!(flow.back(), BookingStep::Receipt);
        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBookingStep);
        assert_eq!(state.orders().len(), 1);
    }

    async fn flow_at_review(state: &PortalState) -> BookingFlow {
        let mut flow = BookingFlow::new(state.clone(), &["1".to_string()]).unwrap();
        flow.set_phone("9876543210");
        fill_address(&mut flow);
        assert_eq!(flow.next().await.unwrap(), BookingStep::Payment);
        assert_eq!(flow.next().await.unwrap(), BookingStep::Review);
        flow
    }

    #[tokio::test(start_paused = true)]
    async fn test_review_rechecks_details_edited_after_step_one() {
        let state = state_with_cart();
        let mut flow = flow_at_review(&state).await;

        {
            let details = flow.details_mut();
            details.phone = "1234567890".into();
            details.email = "not-an-email".into();
            details.full_name.clear();
        }
        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(flow.step(), BookingStep::Details);
        assert!(flow.errors().contains("phone"));
        assert!(flow.errors().contains("email"));
        assert!(flow.errors().contains("fullName"));
        assert!(state.orders().is_empty());
        assert!(flow.order().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_receipt_failure_does_not_place_a_second_order() {
        let state = state_with_cart();
        let mut flow = flow_at_review(&state).await.with_receipt_config(ReceiptConfig {
            origin: "https://ic.sona.edu".into(),
            qr_endpoint: "not a url".into(),
        });

        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(flow.step(), BookingStep::Receipt);
        assert!(flow.receipt().is_none());
        let order_id = flow.order().unwrap().id.clone();
        assert_eq!(state.orders().len(), 1);

        // Retrying only retries the receipt
        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(state.orders().len(), 1);

        let mut flow = flow.with_receipt_config(ReceiptConfig::default());
        assert_eq!(flow.next().await.unwrap(), BookingStep::Receipt);
        assert_eq!(flow.receipt().unwrap().order.id, order_id);
        assert_eq!(state.orders().len(), 1);

        let err = flow.next().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBookingStep);
    }
}
