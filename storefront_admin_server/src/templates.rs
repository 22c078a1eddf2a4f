//! Template rendering for the dashboard pages and order-card fragments.
//!
//! Templates are loaded from disk exactly once, when [`TemplateEngine::new`] runs at startup; after that the
//! engine is a shared, read-only collaborator handed to handlers through `web::Data`.

use std::collections::HashMap;

use log::*;
use sag_common::Money;
use storefront_admin_engine::order_objects::{OrderList, OrderView};
use tera::{Context, Tera, Value};

use crate::errors::ServerError;

pub const LAYOUT_TEMPLATE: &str = "layout.html";
pub const ORDERS_PAGE_TEMPLATE: &str = "orders.html";
pub const ORDER_CARD_TEMPLATE: &str = "order_card.html";

#[derive(Clone)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Loads every `.html` template under `template_dir` and registers the `money` filter, which formats the
    /// fixed-point minor-unit amounts the views carry.
    pub fn new(template_dir: &str) -> Result<Self, ServerError> {
        let glob = format!("{template_dir}/**/*.html");
        let mut tera = Tera::new(&glob)
            .map_err(|e| ServerError::InitializeError(format!("Could not load templates from {glob}: {e}")))?;
        tera.register_filter("money", money_filter);
        let loaded = tera.get_template_names().collect::<Vec<_>>().join(", ");
        info!("🖨️ Loaded templates: {loaded}");
        Ok(Self { tera })
    }

    /// Renders the full admin orders page: first the order list into the page body, then the body into the
    /// layout shell.
    pub fn render_orders_page(&self, list: &OrderList) -> Result<String, ServerError> {
        let mut ctx = Context::new();
        ctx.insert("orders", &list.orders);
        ctx.insert("count", &list.count);
        ctx.insert("status", list.bucket.as_query());
        let content = self.render(ORDERS_PAGE_TEMPLATE, &ctx)?;
        let mut layout_ctx = Context::new();
        layout_ctx.insert("content_for_layout", &content);
        self.render(LAYOUT_TEMPLATE, &layout_ctx)
    }

    /// Renders the standalone card fragment for one order. This is the fragment that gets broadcast to connected
    /// dashboards; the list page renders the same template per order, so both paths stay in lockstep.
    pub fn render_order_card(&self, order: &OrderView) -> Result<String, ServerError> {
        let mut ctx = Context::new();
        ctx.insert("order", order);
        self.render(ORDER_CARD_TEMPLATE, &ctx)
    }

    fn render(&self, name: &str, ctx: &Context) -> Result<String, ServerError> {
        self.tera.render(name, ctx).map_err(|e| {
            error!("🖨️ Could not render {name}. {e}");
            ServerError::RenderError(format!("{name}: {e}"))
        })
    }
}

/// Tera filter rendering a minor-unit integer amount as a decimal money string, e.g. `1390` into `13.90`.
fn money_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let cents = value.as_i64().ok_or_else(|| tera::Error::msg("The money filter expects an integer amount"))?;
    Ok(Value::String(Money::from(cents).to_string()))
}

#[cfg(test)]
mod test {
    use storefront_admin_engine::{
        db_types::{FinancialStatus, FulfillmentStatus},
        order_objects::{
            AddressView,
            CustomerSummary,
            DiscountSummary,
            ImageView,
            LineItemView,
            OrderList,
            StatusBucket,
        },
    };

    use super::*;

    fn engine() -> TemplateEngine {
        TemplateEngine::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).expect("Could not load templates")
    }

    fn order_view(order_number: i64) -> OrderView {
        OrderView {
            id: order_number - 10000,
            order_number,
            date: "15 March 2024".to_string(),
            financial_status: FinancialStatus::Unpaid,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            total_shipping_price: 500.into(),
            total_tax: 90.into(),
            total_line_items_price: 900.into(),
            total_discounts: 100.into(),
            subtotal_price: 800.into(),
            total_price: 1390.into(),
            total_weight: 2000,
            discount: Some(DiscountSummary { code: "WELCOME10".into() }),
            line_items: vec![LineItemView {
                id: "li-1".into(),
                title: "Oat milk".into(),
                brand: "Grainworks".into(),
                price: 450.into(),
                grams: 1000,
                quantity: 2,
                display_amount: "1".into(),
                unit: "l".into(),
                product_id: "p-1".into(),
                image: Some(ImageView {
                    src: "https://cdn.example/p-1/0.jpg".into(),
                    src_webp: "https://cdn.example/p-1/0.webp".into(),
                    width: 800,
                    height: 600,
                    alt: "Oat milk".into(),
                }),
                images: vec![],
            }],
            shipping_address: AddressView { address1: "221B Baker Street".into() },
            customer: CustomerSummary { id: 7, phone: "+15550100".into(), locale: "en".into() },
        }
    }

    #[test]
    fn order_card_renders_the_view() {
        let card = engine().render_order_card(&order_view(10042)).unwrap();
        assert!(card.contains("#10042"));
        assert!(card.contains("15 March 2024"));
        assert!(card.contains("Oat milk"));
        assert!(card.contains("13.90"), "total should be money-formatted: {card}");
        assert!(card.contains("https://cdn.example/p-1/0.webp"));
        assert!(card.contains("WELCOME10"));
        // Still open, so the card carries the complete-order form.
        assert!(card.contains("/admin/api/complete_order"));
    }

    #[test]
    fn completed_order_card_has_no_complete_form() {
        let mut view = order_view(10042);
        view.financial_status = FinancialStatus::Paid;
        view.fulfillment_status = FulfillmentStatus::Fulfilled;
        let card = engine().render_order_card(&view).unwrap();
        assert!(!card.contains("/admin/api/complete_order"));
    }

    #[test]
    fn orders_page_wraps_the_cards_in_the_layout() {
        let list = OrderList {
            orders: vec![order_view(10042), order_view(10043)],
            count: 40,
            bucket: StatusBucket::Pending,
        };
        let page = engine().render_orders_page(&list).unwrap();
        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains(r#"class="ttlOrders">40<"#));
        assert!(page.contains(r#"data-status="""#));
        assert!(page.contains("#10042"));
        assert!(page.contains("#10043"));
        assert!(page.contains("/admin/js/main.js"));
    }

    #[test]
    fn completed_page_carries_the_status_attribute() {
        let list = OrderList { orders: vec![], count: 0, bucket: StatusBucket::Completed };
        let page = engine().render_orders_page(&list).unwrap();
        assert!(page.contains(r#"data-status="completed""#));
    }
}
