//! The order view assembler.
//!
//! A pure transformation from fetched records to the denormalized [`OrderView`] the templates consume. Both the
//! list page and the new-order alert go through this one function, so the two render paths can never drift apart.

use sag_common::helpers::full_date;
use thiserror::Error;

use crate::{
    db_types::{Order, Product, ProductId, User},
    order_objects::{AddressView, CustomerSummary, DiscountSummary, ImageView, LineItemView, OrderView},
};

#[derive(Debug, Clone, Error)]
pub enum AssemblyError {
    /// A line item references a product that is not in the supplied product set. This is a data-integrity fault in
    /// the catalog, not a condition to paper over.
    #[error("Line item {line_item} of order {order_id} references product {product_id}, which does not exist")]
    MissingProduct { order_id: i64, line_item: String, product_id: ProductId },
}

/// Assembles the render-ready view of one order from the order record, the products its line items reference, and
/// the purchasing user.
///
/// `products` must contain every product referenced by the order's line items; a dangling reference fails the whole
/// assembly with [`AssemblyError::MissingProduct`]. Extra products are ignored. The creation date is formatted with
/// [`full_date`], so the output is a pure function of the inputs.
pub fn assemble_order_view(order: &Order, products: &[Product], user: &User) -> Result<OrderView, AssemblyError> {
    let mut line_items = Vec::with_capacity(order.line_items.len());
    for item in &order.line_items {
        let product = products.iter().find(|p| p.id == item.product_id).ok_or_else(|| {
            AssemblyError::MissingProduct {
                order_id: order.id,
                line_item: item.id.clone(),
                product_id: item.product_id.clone(),
            }
        })?;
        let images = product
            .images
            .iter()
            .map(|img| ImageView {
                src: img.src.clone(),
                src_webp: img.src_webp.clone(),
                width: img.width,
                height: img.height,
                alt: img.alt.clone(),
            })
            .collect::<Vec<ImageView>>();
        line_items.push(LineItemView {
            id: item.id.clone(),
            title: item.title.clone(),
            brand: item.brand.clone(),
            price: item.price,
            grams: item.grams,
            quantity: item.quantity,
            display_amount: item.display_amount.clone(),
            unit: item.unit.clone(),
            product_id: item.product_id.clone(),
            image: images.first().cloned(),
            images,
        });
    }
    let customer = CustomerSummary { id: user.id, phone: user.phone.clone(), locale: user.locale.clone() };
    let discount = order.discount_code.as_ref().map(|code| DiscountSummary { code: code.clone() });
    Ok(OrderView {
        id: order.id,
        order_number: order.order_number,
        date: full_date(order.created_at),
        financial_status: order.financial_status,
        fulfillment_status: order.fulfillment_status,
        total_shipping_price: order.total_shipping_price,
        total_tax: order.total_tax,
        total_line_items_price: order.total_line_items_price,
        total_discounts: order.total_discounts,
        subtotal_price: order.subtotal_price,
        total_price: order.total_price,
        total_weight: order.total_weight,
        discount,
        line_items,
        shipping_address: AddressView { address1: order.shipping_address.address1.clone() },
        customer,
    })
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use sag_common::Money;

    use super::*;
    use crate::db_types::{FinancialStatus, FulfillmentStatus, LineItem, ProductImage, ShippingAddress};

    fn product(id: &str, image_count: usize) -> Product {
        let images = (0..image_count)
            .map(|n| ProductImage {
                src: format!("https://cdn.example/{id}/{n}.jpg"),
                src_webp: format!("https://cdn.example/{id}/{n}.webp"),
                width: 800,
                height: 600,
                alt: format!("{id} image {n}"),
            })
            .collect();
        Product { id: id.into(), images }
    }

    fn line_item(id: &str, product_id: &str) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: "Oat milk".to_string(),
            brand: "Grainworks".to_string(),
            price: Money::from(450),
            grams: 1000,
            quantity: 2,
            display_amount: "1".to_string(),
            unit: "l".to_string(),
            product_id: product_id.into(),
        }
    }

    fn order(line_items: Vec<LineItem>) -> Order {
        Order {
            id: 42,
            order_number: 10042,
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
            financial_status: FinancialStatus::Unpaid,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            total_shipping_price: Money::from(500),
            total_tax: Money::from(90),
            total_line_items_price: Money::from(900),
            total_discounts: Money::from(100),
            subtotal_price: Money::from(800),
            total_price: Money::from(1390),
            total_weight: 2000,
            discount_code: Some("WELCOME10".to_string()),
            line_items,
            shipping_address: ShippingAddress { address1: "221B Baker Street".to_string() },
            user_id: 7,
        }
    }

    fn user() -> User {
        User { id: 7, phone: "+15550100".to_string(), locale: "en".to_string(), is_admin: false }
    }

    #[test]
    fn assembly_is_deterministic() {
        let order = order(vec![line_item("li-1", "p-1")]);
        let products = vec![product("p-1", 2)];
        let user = user();
        let first = assemble_order_view(&order, &products, &user).unwrap();
        let second = assemble_order_view(&order, &products, &user).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.date, "15 March 2024");
        assert_eq!(first.customer, CustomerSummary { id: 7, phone: "+15550100".into(), locale: "en".into() });
        assert_eq!(first.discount, Some(DiscountSummary { code: "WELCOME10".into() }));
    }

    #[test]
    fn primary_image_is_the_first_image() {
        let order = order(vec![line_item("li-1", "p-1")]);
        let products = vec![product("p-1", 3)];
        let view = assemble_order_view(&order, &products, &user()).unwrap();
        let item = &view.line_items[0];
        assert_eq!(item.images.len(), 3);
        assert_eq!(item.image.as_ref(), item.images.first());
    }

    #[test]
    fn product_without_images_yields_no_primary_image() {
        let order = order(vec![line_item("li-1", "p-1")]);
        let products = vec![product("p-1", 0)];
        let view = assemble_order_view(&order, &products, &user()).unwrap();
        let item = &view.line_items[0];
        assert!(item.images.is_empty());
        assert!(item.image.is_none());
    }

    #[test]
    fn dangling_product_reference_is_an_error() {
        let order = order(vec![line_item("li-1", "p-1"), line_item("li-2", "p-missing")]);
        let products = vec![product("p-1", 1)];
        let err = assemble_order_view(&order, &products, &user()).unwrap_err();
        let AssemblyError::MissingProduct { order_id, line_item, product_id } = err;
        assert_eq!(order_id, 42);
        assert_eq!(line_item, "li-2");
        assert_eq!(product_id, "p-missing".into());
    }

    #[test]
    fn no_discount_code_means_no_discount_summary() {
        let mut order = order(vec![]);
        order.discount_code = None;
        let view = assemble_order_view(&order, &[], &user()).unwrap();
        assert!(view.discount.is_none());
        assert!(view.line_items.is_empty());
    }
}
