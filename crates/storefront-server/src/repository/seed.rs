//! Sample catalog loaded when `catalog.seed` is enabled.

use storefront_core::NewProduct;

const SAMPLE: &[(&str, &str, f64, &str, i64, &str)] = &[
    (
        "iPhone 15 Pro",
        "El iPhone más avanzado con chip A17 Pro, cámara de 48MP y diseño en titanio.",
        999.99,
        "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400&h=400&fit=crop",
        25,
        "Electrónicos",
    ),
    (
        "MacBook Air M2",
        "Laptop ultraligera con chip M2, pantalla Liquid Retina de 13.6\" y hasta 18 horas de batería.",
        1199.99,
        "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=400&h=400&fit=crop",
        15,
        "Electrónicos",
    ),
    (
        "Nike Air Max 270",
        "Zapatillas deportivas con tecnología Air Max para máxima comodidad y estilo.",
        129.99,
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=400&fit=crop",
        50,
        "Deportes",
    ),
    (
        "Samsung 4K Smart TV",
        "Televisor inteligente de 55\" con resolución 4K, HDR y sistema operativo Tizen.",
        699.99,
        "https://images.unsplash.com/photo-1593359677879-a4bb92f829d1?w=400&h=400&fit=crop",
        12,
        "Electrónicos",
    ),
    (
        "Camiseta Básica Algodón",
        "Camiseta 100% algodón orgánico, cómoda y transpirable para uso diario.",
        24.99,
        "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400&h=400&fit=crop",
        100,
        "Ropa",
    ),
    (
        "Cafetera Automática",
        "Cafetera programable con molinillo integrado y múltiples opciones de preparación.",
        89.99,
        "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400&h=400&fit=crop",
        30,
        "Hogar",
    ),
    (
        "Libro \"El Principito\"",
        "Clásico de la literatura universal de Antoine de Saint-Exupéry, edición especial.",
        19.99,
        "https://images.unsplash.com/photo-1544947950-fa07a98d237f?w=400&h=400&fit=crop",
        75,
        "Libros",
    ),
    (
        "Auriculares Bluetooth Sony",
        "Auriculares inalámbricos con cancelación de ruido y hasta 30 horas de batería.",
        199.99,
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=400&fit=crop",
        40,
        "Electrónicos",
    ),
    (
        "Sofá Moderno 3 Plazas",
        "Sofá elegante con diseño minimalista, perfecto para salas modernas.",
        599.99,
        "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?w=400&h=400&fit=crop",
        8,
        "Hogar",
    ),
    (
        "Balón de Fútbol Profesional",
        "Balón oficial de competición con tecnología de última generación.",
        79.99,
        "https://images.unsplash.com/photo-1579952363873-27f3bade9f55?w=400&h=400&fit=crop",
        35,
        "Deportes",
    ),
    (
        "Jeans Slim Fit",
        "Jeans de alta calidad con corte slim fit, perfectos para cualquier ocasión.",
        59.99,
        "https://images.unsplash.com/photo-1542272604-787c3835535d?w=400&h=400&fit=crop",
        60,
        "Ropa",
    ),
    (
        "Lámpara de Mesa LED",
        "Lámpara moderna con luz LED ajustable y diseño elegante para escritorio.",
        45.99,
        "https://images.unsplash.com/photo-1507473885765-e6ed057f782c?w=400&h=400&fit=crop",
        25,
        "Hogar",
    ),
];

/// The sample catalog as creation payloads.
pub fn sample_products() -> Vec<NewProduct> {
    SAMPLE
        .iter()
        .map(|&(name, description, price, image, stock, category)| NewProduct {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image: image.to_string(),
            stock,
            category: category.to_string(),
        })
        .collect()
}
