//! Order message formatting.
//!
//! The order message is handed to a messaging deep link as an opaque,
//! already-escaped string. Formatting is a pure function of the line list, so
//! identical carts always produce byte-identical messages.

use pricelist_core::CartLine;
use rust_decimal::Decimal;

/// First line of every order message.
pub const ORDER_HEADER: &str = "*Nuevo Pedido*";

/// Sum of `price x quantity` over `lines`.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Plain-text order message.
///
/// One block per line (name and brand, variant, quantity times price equals
/// subtotal), blocks separated by a blank line, followed by the grand total.
#[must_use]
pub fn order_text(lines: &[CartLine]) -> String {
    let blocks = lines
        .iter()
        .map(|line| {
            format!(
                "• {} ({})\n  Aroma: {}\n  Cantidad: {} x ${} = ${}",
                line.name,
                line.brand,
                line.variant,
                line.quantity,
                line.price,
                line.subtotal().normalize(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{ORDER_HEADER}\n\n{blocks}\n\n*Total: ${}*",
        cart_total(lines).normalize()
    )
}

/// Percent-encoded order message, safe to interpolate into a URL.
#[must_use]
pub fn encode_order_message(lines: &[CartLine]) -> String {
    urlencoding::encode(&order_text(lines)).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pricelist_core::{Price, ProductId, Quantity, VariantLabel};

    use super::*;

    fn line(id: &str, name: &str, brand: &str, variant: &str, price: Price, qty: i64) -> CartLine {
        CartLine {
            id: ProductId::parse(id).unwrap(),
            name: name.to_string(),
            price,
            quantity: Quantity::new(qty).unwrap(),
            variant: VariantLabel::parse(variant).unwrap(),
            brand: brand.to_string(),
        }
    }

    fn sample() -> Vec<CartLine> {
        vec![
            line("p1", "Difusor", "Aromanza", "Lavanda", Price::from_units(1500), 2),
            line(
                "p2",
                "Vela",
                "Luz & Co",
                "Vainilla",
                "12.5".parse().unwrap(),
                1,
            ),
        ]
    }

    #[test]
    fn test_order_text_layout() {
        let expected = "*Nuevo Pedido*\n\n\
            • Difusor (Aromanza)\n  Aroma: Lavanda\n  Cantidad: 2 x $1500 = $3000\n\n\
            • Vela (Luz & Co)\n  Aroma: Vainilla\n  Cantidad: 1 x $12.5 = $12.5\n\n\
            *Total: $3012.5*";
        assert_eq!(order_text(&sample()), expected);
    }

    #[test]
    fn test_empty_cart_text() {
        assert_eq!(order_text(&[]), "*Nuevo Pedido*\n\n\n\n*Total: $0*");
    }

    #[test]
    fn test_encoded_message_is_url_safe() {
        let encoded = encode_order_message(&sample());
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('&'));
        assert!(encoded.starts_with("%2ANuevo%20Pedido%2A"));
        assert_eq!(urlencoding::decode(&encoded).unwrap(), order_text(&sample()));
    }

    #[test]
    fn test_message_is_deterministic() {
        let lines = sample();
        assert_eq!(encode_order_message(&lines), encode_order_message(&lines));
    }

    #[test]
    fn test_cart_total() {
        assert_eq!(cart_total(&sample()), "3012.5".parse::<Decimal>().unwrap());
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }
}
