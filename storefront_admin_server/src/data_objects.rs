use serde::Deserialize;

/// Body of the new-order alert call, posted by the order-placement flow when a customer checks out.
///
/// The id is an `Option` so that an absent field surfaces as a validation error with a useful message rather than
/// a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderAlert {
    pub id: Option<i64>,
}

/// Body of the complete-order call, posted by the order card's form on the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteOrderParams {
    #[serde(rename = "orderId")]
    pub order_id: Option<i64>,
}

/// The `status` query value on the orders list page. Anything other than `completed` selects the pending view.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}
