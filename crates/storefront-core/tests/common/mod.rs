#![allow(dead_code)]
use chrono::{DateTime, Duration, TimeZone, Utc};
use storefront_core::{NewProduct, Product};

/// Fixed base instant so listing order is deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Builds a product created `minutes` after [`base_time`].
pub fn product(name: &str, category: &str, price: f64, stock: i64, minutes: i64) -> Product {
    let input = NewProduct {
        name: name.to_string(),
        description: format!("{name} de ejemplo para el catalogo"),
        price,
        image: format!("https://images.example.com/{}.jpg", name.to_lowercase().replace(' ', "-")),
        stock,
        category: category.to_string(),
    };
    Product::create(input, base_time() + Duration::minutes(minutes))
        .expect("fixture product must be valid")
}

/// A small mixed catalog, oldest first.
pub fn catalog() -> Vec<Product> {
    vec![
        product("iPhone 15 Pro", "Electrónicos", 999.99, 25, 0),
        product("Nike Air Max 270", "Deportes", 129.99, 50, 1),
        product("Camiseta Basica", "Ropa", 24.99, 100, 2),
        product("Cafetera Automatica", "Hogar", 89.99, 30, 3),
        product("El Principito", "Libros", 19.99, 75, 4),
        product("Auriculares Sony", "Electrónicos", 199.99, 40, 5),
    ]
}
