use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use sag_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   FinancialStatus   ----------------------------------------------------------
/// Payment state of an order. Stored as lowercase text, which is also the representation the status filters match
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    /// No payment has been captured for the order.
    Unpaid,
    /// The order has been paid in full.
    Paid,
    /// The payment was captured and subsequently refunded.
    Refunded,
}

impl Display for FinancialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialStatus::Unpaid => write!(f, "unpaid"),
            FinancialStatus::Paid => write!(f, "paid"),
            FinancialStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct StatusConversionError(String);

impl FromStr for FinancialStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            s => Err(StatusConversionError(format!("Invalid financial status: {s}"))),
        }
    }
}

impl From<String> for FinancialStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid financial status: {value}. But this conversion cannot fail. Defaulting to unpaid");
            FinancialStatus::Unpaid
        })
    }
}

//--------------------------------------  FulfillmentStatus  ----------------------------------------------------------
/// Shipping state of an order, independent of the payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    /// Nothing has shipped yet.
    Unfulfilled,
    /// Every line item has shipped.
    Fulfilled,
    /// Some, but not all, line items have shipped.
    Partial,
}

impl Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfillmentStatus::Unfulfilled => write!(f, "unfulfilled"),
            FulfillmentStatus::Fulfilled => write!(f, "fulfilled"),
            FulfillmentStatus::Partial => write!(f, "partial"),
        }
    }
}

impl FromStr for FulfillmentStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unfulfilled" => Ok(Self::Unfulfilled),
            "fulfilled" => Ok(Self::Fulfilled),
            "partial" => Ok(Self::Partial),
            s => Err(StatusConversionError(format!("Invalid fulfillment status: {s}"))),
        }
    }
}

impl From<String> for FulfillmentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid fulfillment status: {value}. But this conversion cannot fail. Defaulting to unfulfilled");
            FulfillmentStatus::Unfulfilled
        })
    }
}

//--------------------------------------      ProductId      ----------------------------------------------------------
/// Catalog product identifier, as assigned by the storefront. Line items reference products by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ProductId(pub String);

impl FromStr for ProductId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      LineItem       ----------------------------------------------------------
/// One purchased unit within an order. Line items are immutable once the order has been placed; they ride along
/// inside the order record as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: Money,
    pub grams: i64,
    pub quantity: i64,
    pub display_amount: String,
    pub unit: String,
    pub product_id: ProductId,
}

//--------------------------------------   ShippingAddress   ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
}

//--------------------------------------     ProductImage    ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    pub src_webp: String,
    pub width: i64,
    pub height: i64,
    pub alt: String,
}

//--------------------------------------       Product       ----------------------------------------------------------
/// Catalog entry. Owned by the storefront; the admin gateway only ever reads it to resolve line-item images.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: ProductId,
    #[sqlx(json)]
    pub images: Vec<ProductImage>,
}

//--------------------------------------        User         ----------------------------------------------------------
/// A storefront user. Customers and admin operators share the record type; the `is_admin` flag is the only thing
/// this system inspects beyond the customer summary fields.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub phone: String,
    pub locale: String,
    pub is_admin: bool,
}

//--------------------------------------        Order        ----------------------------------------------------------
/// A persisted customer purchase. Orders are created by the storefront's order-placement flow; the admin gateway
/// only reads them and, via the complete-order operation, stamps them paid and fulfilled.
///
/// `id` is the internally assigned monotonic identifier and the newest-first sort key for list views.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
    pub id: i64,
    pub order_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub financial_status: FinancialStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub total_shipping_price: Money,
    pub total_tax: Money,
    pub total_line_items_price: Money,
    pub total_discounts: Money,
    pub subtotal_price: Money,
    pub total_price: Money,
    pub total_weight: i64,
    pub discount_code: Option<String>,
    #[sqlx(json)]
    pub line_items: Vec<LineItem>,
    #[sqlx(json)]
    pub shipping_address: ShippingAddress,
    pub user_id: i64,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.financial_status == FinancialStatus::Paid
    }

    pub fn is_fulfilled(&self) -> bool {
        self.fulfillment_status == FulfillmentStatus::Fulfilled
    }

    /// The product ids referenced by this order's line items, in line-item order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.line_items.iter().map(|item| item.product_id.clone()).collect()
    }
}
