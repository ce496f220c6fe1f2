//! Checkout: turning a cart into an order.
//!
//! The order is a denormalized snapshot of the cart at the moment of
//! purchase - product ids, names, and unit prices are copied into the order
//! items, so later catalog edits never rewrite order history.

use tamarind_core::{Email, NewOrder, Order, OrderItem, OrderStatus, UserId};

use crate::cart::LocalCart;
use crate::collection::OrderBook;
use crate::error::CheckoutError;

/// Customer details collected by the checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub user_id: UserId,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
}

/// Place an order from the current cart, then clear the cart.
///
/// The two steps fail independently: a creation failure leaves the cart
/// exactly as it was, while the clear cannot fail the checkout because cart
/// persistence errors are absorbed locally.
///
/// # Errors
///
/// [`CheckoutError::EmptyCart`] when there is nothing to order, and
/// [`CheckoutError::Order`] when the remote write fails.
pub async fn place_order(
    cart: &mut LocalCart,
    orders: &OrderBook,
    details: CheckoutDetails,
) -> Result<Order, CheckoutError> {
    if cart.items().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let items = cart
        .items()
        .iter()
        .map(|line| OrderItem {
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            price: line.product.price,
        })
        .collect();

    let draft = NewOrder {
        user_id: details.user_id,
        customer_name: details.customer_name,
        email: details.email,
        phone: details.phone,
        address: details.address,
        payment_method: details.payment_method,
        amount: cart.total_price(),
        status: OrderStatus::Pending,
        items,
    };

    let order = orders.create(&draft).await?;
    cart.clear();
    Ok(order)
}
