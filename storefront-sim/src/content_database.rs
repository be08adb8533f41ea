//! Sample fashion catalog for development mode.

use storefront_core::Product;

struct SampleEntry {
    id: &'static str,
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    price: f64,
    description: &'static str,
    caption: &'static str,
    image_description: &'static str,
    tags: &'static [&'static str],
}

const SAMPLE_ENTRIES: &[SampleEntry] = &[
    SampleEntry {
        id: "1",
        name: "Relaxed Linen Shirt",
        brand: "Northwind",
        category: "Tops",
        price: 39000.0,
        description: "A breathable linen shirt with a relaxed fit, ideal for warm summer days.",
        caption: "white linen shirt on a wooden hanger",
        image_description: "A loose white linen button-up shirt with rolled sleeves and a chest pocket.",
        tags: &["shirt", "linen", "white", "summer"],
    },
    SampleEntry {
        id: "2",
        name: "Classic Wool Coat",
        brand: "Harbor & Pine",
        category: "Outerwear",
        price: 189000.0,
        description: "A tailored wool-blend coat that keeps you warm through the coldest winter mornings.",
        caption: "camel wool coat on a mannequin",
        image_description: "A knee-length camel coat with notch lapels and a two-button front.",
        tags: &["coat", "wool", "camel", "winter"],
    },
    SampleEntry {
        id: "3",
        name: "Slim Fit Denim Jeans",
        brand: "Bluefield",
        category: "Bottoms",
        price: 59000.0,
        description: "Everyday stretch denim jeans with a slim leg and a mid-rise waist.",
        caption: "dark blue jeans folded on a table",
        image_description: "Dark indigo slim jeans with contrast stitching and five pockets.",
        tags: &["jeans", "denim", "blue", "casual"],
    },
    SampleEntry {
        id: "4",
        name: "Leather Chelsea Boots",
        brand: "Stonegate",
        category: "Shoes",
        price: 129000.0,
        description: "Polished leather chelsea boots with elastic side panels and a durable rubber sole.",
        caption: "pair of brown leather boots",
        image_description: "Brown ankle boots with elastic gussets and pull tabs at the heel.",
        tags: &["boots", "leather", "brown", "autumn"],
    },
    SampleEntry {
        id: "5",
        name: "Cotton Crew Neck T-Shirt",
        brand: "Northwind",
        category: "Tops",
        price: 15000.0,
        description: "A soft cotton t-shirt with a classic crew neck, a wardrobe essential for any season.",
        caption: "black t-shirt laid flat",
        image_description: "A plain black short-sleeve t-shirt photographed on a white background.",
        tags: &["t-shirt", "cotton", "black", "basic"],
    },
    SampleEntry {
        id: "6",
        name: "Quilted Puffer Jacket",
        brand: "Alpine Trail",
        category: "Outerwear",
        price: 149000.0,
        description: "A lightweight quilted puffer jacket with down insulation and a water-repellent shell.",
        caption: "navy puffer jacket with hood",
        image_description: "A navy hooded puffer jacket with horizontal quilting and zip pockets.",
        tags: &["jacket", "puffer", "navy", "winter"],
    },
    SampleEntry {
        id: "7",
        name: "Floral Midi Dress",
        brand: "Maison Lumi",
        category: "Dresses",
        price: 79000.0,
        description: "A flowing midi dress with a floral print, perfect for spring picnics and garden parties.",
        caption: "floral dress in a sunny garden",
        image_description: "A pastel floral midi dress with puff sleeves and a tie waist.",
        tags: &["dress", "floral", "spring", "pastel"],
    },
    SampleEntry {
        id: "8",
        name: "Cashmere Knit Sweater",
        brand: "Harbor & Pine",
        category: "Knitwear",
        price: 119000.0,
        description: "A luxuriously soft cashmere sweater with a ribbed hem, made for cozy winter layering.",
        caption: "grey knit sweater folded",
        image_description: "A heather grey crew neck sweater in fine cashmere knit.",
        tags: &["sweater", "cashmere", "grey", "winter"],
    },
    SampleEntry {
        id: "9",
        name: "Canvas Low-Top Sneakers",
        brand: "Stonegate",
        category: "Shoes",
        price: 49000.0,
        description: "Lightweight canvas sneakers with a cushioned insole for all-day comfort.",
        caption: "white sneakers on pavement",
        image_description: "Clean white low-top canvas sneakers with white laces and gum soles.",
        tags: &["sneakers", "canvas", "white", "casual"],
    },
    SampleEntry {
        id: "10",
        name: "Pleated Chino Trousers",
        brand: "Bluefield",
        category: "Bottoms",
        price: 55000.0,
        description: "Smart pleated chinos in a cotton twill that move easily from office to weekend.",
        caption: "beige trousers on a hanger",
        image_description: "Beige high-waisted chino trousers with front pleats and a tapered leg.",
        tags: &["trousers", "chino", "beige", "office"],
    },
    SampleEntry {
        id: "11",
        name: "Silk Scarf",
        brand: "Maison Lumi",
        category: "Accessories",
        price: 45000.0,
        description: "A square silk scarf with a hand-drawn pattern that adds color to any outfit.",
        caption: "patterned silk scarf tied on a bag",
        image_description: "A red and gold square silk scarf with a paisley pattern.",
        tags: &["scarf", "silk", "red", "accessory"],
    },
    SampleEntry {
        id: "12",
        name: "Waterproof Rain Jacket",
        brand: "Alpine Trail",
        category: "Outerwear",
        price: 99000.0,
        description: "A packable waterproof rain jacket with taped seams and an adjustable hood.",
        caption: "yellow rain jacket in the rain",
        image_description: "A bright yellow hooded shell jacket with a full-length zip.",
        tags: &["jacket", "rain", "yellow", "waterproof"],
    },
];

/// Creates the sample catalog used by the in-memory index.
///
/// Products carry no `descriptionVector`; the catalog embeds them on load.
pub fn create_sample_catalog() -> Vec<Product> {
    SAMPLE_ENTRIES
        .iter()
        .map(|entry| {
            let mut product = Product::new(entry.id, entry.name);
            product.brand = Some(entry.brand.to_string());
            product.description = Some(entry.description.to_string());
            product.price = Some(entry.price);
            product.image_url = Some(format!(
                "https://picsum.photos/seed/storefront-{}/400/400",
                entry.id
            ));
            product.image_caption = Some(entry.caption.to_string());
            product.image_description = Some(entry.image_description.to_string());
            product.image_tags = entry.tags.iter().map(|tag| tag.to_string()).collect();
            product.extra.insert(
                "category".to_string(),
                serde_json::Value::String(entry.category.to_string()),
            );
            product
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sample_catalog_ids_are_unique() {
        let catalog = create_sample_catalog();
        let ids: HashSet<_> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.len() > 9, "catalog should span more than one page");
    }

    #[test]
    fn test_sample_products_are_complete() {
        for product in create_sample_catalog() {
            assert!(product.price.is_some());
            assert!(!product.image_tags.is_empty());
            assert!(product.extra_text("category").is_some());
            assert!(product.description_vector.is_none());
        }
    }
}
