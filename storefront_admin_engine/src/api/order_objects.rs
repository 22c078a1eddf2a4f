//! Render-ready projections of order data.
//!
//! Everything in this module is a transient value, assembled fresh per request and handed straight to the template
//! renderer. Nothing here is persisted.

use std::fmt::Display;

use sag_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{FinancialStatus, FulfillmentStatus, Order, ProductId};

//--------------------------------------    StatusBucket     ----------------------------------------------------------
/// The two list views the dashboard offers. Buckets are derived from the pair of independent status fields rather
/// than stored; an order that is paid but not fulfilled (or the reverse) lands in neither bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    #[default]
    Pending,
    Completed,
}

impl StatusBucket {
    /// Maps the `status` query value onto a bucket. `"completed"` selects the completed view; anything else,
    /// including no value at all, selects pending.
    pub fn from_query(status: Option<&str>) -> Self {
        match status {
            Some("completed") => StatusBucket::Completed,
            _ => StatusBucket::Pending,
        }
    }

    /// The query value that round-trips back to this bucket. Pending renders as the empty string so the page can
    /// carry it in a `data-status` attribute the way the live-update script expects.
    pub fn as_query(&self) -> &'static str {
        match self {
            StatusBucket::Pending => "",
            StatusBucket::Completed => "completed",
        }
    }

    /// Whether an order belongs to this bucket.
    pub fn contains(&self, order: &Order) -> bool {
        match self {
            StatusBucket::Pending => !order.is_paid() && !order.is_fulfilled(),
            StatusBucket::Completed => order.is_paid() && order.is_fulfilled(),
        }
    }
}

impl Display for StatusBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusBucket::Pending => write!(f, "pending"),
            StatusBucket::Completed => write!(f, "completed"),
        }
    }
}

//--------------------------------------  MissingUserPolicy  ----------------------------------------------------------
/// What to do when an order's purchaser record cannot be found. The list view drops such orders silently; the
/// single-order alert flow treats the dangling reference as a hard fault. Both behaviors are deliberate and named
/// so call sites opt in explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingUserPolicy {
    /// Drop the order from the result set and carry on.
    Skip,
    /// Fail the whole operation.
    Reject,
}

//--------------------------------------       Views         ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageView {
    pub src: String,
    pub src_webp: String,
    pub width: i64,
    pub height: i64,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemView {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: Money,
    pub grams: i64,
    pub quantity: i64,
    pub display_amount: String,
    pub unit: String,
    pub product_id: ProductId,
    /// The first of `images`, or `None` for a product with no imagery.
    pub image: Option<ImageView>,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: i64,
    pub phone: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSummary {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressView {
    pub address1: String,
}

/// The denormalized, render-ready projection of one order: order fields plus resolved product images and the
/// customer summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub order_number: i64,
    pub date: String,
    pub financial_status: FinancialStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub total_shipping_price: Money,
    pub total_tax: Money,
    pub total_line_items_price: Money,
    pub total_discounts: Money,
    pub subtotal_price: Money,
    pub total_price: Money,
    pub total_weight: i64,
    pub discount: Option<DiscountSummary>,
    pub line_items: Vec<LineItemView>,
    pub shipping_address: AddressView,
    pub customer: CustomerSummary,
}

/// One page of assembled order views plus the total bucket count. `count` reflects the whole bucket and can exceed
/// the number of views once more than a page's worth of orders exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderView>,
    pub count: i64,
    pub bucket: StatusBucket,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db_types::{FinancialStatus, FulfillmentStatus};

    fn order_with(financial: FinancialStatus, fulfillment: FulfillmentStatus) -> Order {
        use chrono::TimeZone;
        Order {
            id: 1,
            order_number: 1001,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            updated_at: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            financial_status: financial,
            fulfillment_status: fulfillment,
            total_shipping_price: 0.into(),
            total_tax: 0.into(),
            total_line_items_price: 0.into(),
            total_discounts: 0.into(),
            subtotal_price: 0.into(),
            total_price: 0.into(),
            total_weight: 0,
            discount_code: None,
            line_items: vec![],
            shipping_address: crate::db_types::ShippingAddress { address1: "10 Main Rd".into() },
            user_id: 7,
        }
    }

    #[test]
    fn buckets_partition_the_observed_filters() {
        let pending = order_with(FinancialStatus::Unpaid, FulfillmentStatus::Unfulfilled);
        let completed = order_with(FinancialStatus::Paid, FulfillmentStatus::Fulfilled);
        assert!(StatusBucket::Pending.contains(&pending));
        assert!(!StatusBucket::Completed.contains(&pending));
        assert!(StatusBucket::Completed.contains(&completed));
        assert!(!StatusBucket::Pending.contains(&completed));
    }

    #[test]
    fn half_completed_orders_belong_to_neither_bucket() {
        // Expected behavior, not a bug: the filters are a partial partition.
        let paid_only = order_with(FinancialStatus::Paid, FulfillmentStatus::Unfulfilled);
        let shipped_only = order_with(FinancialStatus::Unpaid, FulfillmentStatus::Fulfilled);
        for order in [&paid_only, &shipped_only] {
            assert!(!StatusBucket::Pending.contains(order));
            assert!(!StatusBucket::Completed.contains(order));
        }
    }

    #[test]
    fn bucket_from_query_value() {
        assert_eq!(StatusBucket::from_query(Some("completed")), StatusBucket::Completed);
        assert_eq!(StatusBucket::from_query(Some("anything")), StatusBucket::Pending);
        assert_eq!(StatusBucket::from_query(None), StatusBucket::Pending);
        assert_eq!(StatusBucket::Completed.as_query(), "completed");
        assert_eq!(StatusBucket::Pending.as_query(), "");
    }
}
