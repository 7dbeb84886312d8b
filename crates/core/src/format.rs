//! Human readable order reports.
//!
//! The layout is fixed and tests compare it byte for byte:
//!
//! ```text
//! dinner
//!   price: $34.07
//!   products: 
//!     Medium (12") Hand Tossed MeatZZa™
//!       code:     12SCMEATZA
//!       options:  map[]
//!       quantity: 1
//!   storeID: 4336
//!   method:  Carryout
//!   address: 1600 Pennsylvania Ave NW
//!            Washington DC, 20500
//! ```
//!
//! The price line only appears when a price is given. Fetching that price is
//! up to the caller, so a failed lookup happens before anything is written.

use core::fmt::{self, Write};

use serde_json::Value;

use crate::types::{LineItem, Options, Order, Price};

const ADDRESS_LABEL: &str = "  address: ";

/// Render an order report.
#[must_use]
pub fn render(name: &str, order: &Order, price: Option<&Price>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_order(&mut out, name, order, price);
    out
}

/// Write an order report to `w`.
///
/// # Errors
///
/// Propagates errors from the writer.
pub fn write_order(
    w: &mut impl Write,
    name: &str,
    order: &Order,
    price: Option<&Price>,
) -> fmt::Result {
    writeln!(w, "{name}")?;
    if let Some(price) = price {
        writeln!(w, "  price: {}", price.display())?;
    }

    writeln!(w, "  products: ")?;
    for item in &order.products {
        write_line_item(w, item)?;
    }

    writeln!(w, "  storeID: {}", order.store_id)?;
    writeln!(w, "  method:  {}", order.service_method)?;
    writeln!(w, "{ADDRESS_LABEL}{}", order.address.street)?;
    writeln!(
        w,
        "{:width$}{}",
        "",
        order.address.locality(),
        width = ADDRESS_LABEL.len()
    )
}

fn write_line_item(w: &mut impl Write, item: &LineItem) -> fmt::Result {
    let title = if item.name.is_empty() {
        &item.code
    } else {
        &item.name
    };
    writeln!(w, "    {title}")?;
    writeln!(w, "      code:     {}", item.code)?;
    writeln!(w, "      options:  {}", format_options(&item.options))?;
    writeln!(w, "      quantity: {}", item.quantity)
}

/// Render an options map as `map[key:value ...]`, keys sorted.
///
/// An empty map renders as `map[]`.
#[must_use]
pub fn format_options(options: &Options) -> String {
    let mut out = String::from("map[");
    for (i, (key, value)) in options.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(key);
        out.push(':');
        push_value(&mut out, value);
    }
    out.push(']');
    out
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("<nil>"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) if n.is_f64() => {
            // whole floats print without a fraction: 1.0 is "1"
            let _ = write!(out, "{}", n.as_f64().unwrap_or_default());
        }
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                push_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push_str("map[");
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                push_value(out, item);
            }
            out.push(']');
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{Address, Product, ServiceMethod};

    fn test_order() -> Order {
        Order::for_store(
            "4336",
            ServiceMethod::Carryout,
            Address {
                street: "1600 Pennsylvania Ave NW".to_owned(),
                city: "Washington".to_owned(),
                region: "DC".to_owned(),
                postal_code: "20500".to_owned(),
            },
        )
    }

    #[test]
    fn test_render_without_price() {
        let mut order = test_order();
        order.add_product(&Product::new("12SCMEATZA", "Medium (12\") Hand Tossed MeatZZa™"));

        let expected = concat!(
            "testorder\n",
            "  products: \n",
            "    Medium (12\") Hand Tossed MeatZZa™\n",
            "      code:     12SCMEATZA\n",
            "      options:  map[]\n",
            "      quantity: 1\n",
            "  storeID: 4336\n",
            "  method:  Carryout\n",
            "  address: 1600 Pennsylvania Ave NW\n",
            "           Washington DC, 20500\n",
        );
        assert_eq!(render("testorder", &order, None), expected);
    }

    #[test]
    fn test_render_with_price() {
        let mut order = test_order();
        order.add_product(&Product::new("12SCMEATZA", "Medium (12\") Hand Tossed MeatZZa™"));
        order.add_product(&Product::new("W08PBNLW", "8-Piece Boneless Chicken"));
        order.add_product(&Product::new("W08PPLNW", "8-piece Plain Wings"));
        let price = Price::from_f64(34.07).unwrap();

        let expected = "testorder\n  price: $34.07\n  products: \n    Medium (12\") Hand Tossed MeatZZa™\n      code:     12SCMEATZA\n      options:  map[]\n      quantity: 1\n    8-Piece Boneless Chicken\n      code:     W08PBNLW\n      options:  map[]\n      quantity: 1\n    8-piece Plain Wings\n      code:     W08PPLNW\n      options:  map[]\n      quantity: 1\n  storeID: 4336\n  method:  Carryout\n  address: 1600 Pennsylvania Ave NW\n           Washington DC, 20500\n";
        assert_eq!(render("testorder", &order, Some(&price)), expected);
    }

    #[test]
    fn test_render_empty_order() {
        let rendered = render("empty", &test_order(), None);
        assert!(rendered.starts_with("empty\n  products: \n  storeID: 4336\n"));
    }

    #[test]
    fn test_render_falls_back_to_code_without_name() {
        let mut order = test_order();
        order.products.push(LineItem {
            code: "P12IPAZA".to_owned(),
            name: String::new(),
            quantity: 2,
            options: Options::new(),
        });
        let rendered = render("legacy", &order, None);
        assert!(rendered.contains("\n    P12IPAZA\n      code:     P12IPAZA\n"));
        assert!(rendered.contains("      quantity: 2\n"));
    }

    #[test]
    fn test_format_options() {
        assert_eq!(format_options(&Options::new()), "map[]");

        let mut options = Options::new();
        options.insert("X".to_owned(), json!({"1/1": "1"}));
        options.insert("C".to_owned(), json!({"1/2": 1.5, "1/1": 1}));
        assert_eq!(format_options(&options), "map[C:map[1/1:1 1/2:1.5] X:map[1/1:1]]");
    }

    #[test]
    fn test_format_options_whole_floats_drop_fraction() {
        let mut options = Options::new();
        options.insert("X".to_owned(), json!({"1/1": 1.0}));
        options.insert("Y".to_owned(), json!([-2.0, 0.5, 3]));
        assert_eq!(format_options(&options), "map[X:map[1/1:1] Y:[-2 0.5 3]]");
    }

    #[test]
    fn test_format_options_scalars() {
        let mut options = Options::new();
        options.insert("a".to_owned(), json!(true));
        options.insert("b".to_owned(), json!(null));
        options.insert("c".to_owned(), json!(["x", 2]));
        assert_eq!(format_options(&options), "map[a:true b:<nil> c:[x 2]]");
    }
}
