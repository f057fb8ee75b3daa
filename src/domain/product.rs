use serde::{Deserialize, Serialize};

/// Image shown for products listed without an upload.
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1544644181-1484b3fdfc62?auto=format&fit=crop&q=80&w=400";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Tour,
    Transport,
    Hotel,
    Tiket,
    Lainnya,
}

/// Represents a listing in the cooperative catalog.
///
/// `stock` is the only field that changes after creation, and it only goes
/// down (by the quantities committed at checkout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub name: String,
    /// Whole rupiah.
    pub price: u64,
    pub category: Category,
    pub image: String,
    pub description: String,
    pub stock: u32,
    pub variants: Vec<String>,
}

impl Product {
    pub fn offers_variant(&self, variant: Option<&str>) -> bool {
        match variant {
            None => self.variants.is_empty(),
            Some(v) => self.variants.iter().any(|known| known == v),
        }
    }
}

/// Payload for listing a new product. Owner fields come from the acting vendor.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: u64,
    pub category: Category,
    pub image: Option<String>,
    pub description: String,
    pub stock: u32,
    pub variants: Vec<String>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            name: name.into(),
            price,
            category: Category::default(),
            image: None,
            description: String::new(),
            stock,
            variants: Vec::new(),
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Splits the comma-separated variant field of the listing form.
pub fn parse_variants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants_trims_and_drops_empty() {
        let variants = parse_variants(" Pagi (08:00), ,Siang (11:00),");
        assert_eq!(variants, vec!["Pagi (08:00)", "Siang (11:00)"]);
        assert!(parse_variants("").is_empty());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(serde_json::to_string(&Category::Transport).unwrap(), "\"transport\"");
        let tiket: Category = serde_json::from_str("\"tiket\"").unwrap();
        assert_eq!(tiket, Category::Tiket);
    }

    #[test]
    fn test_offers_variant() {
        let mut product = Product {
            id: "product_1".into(),
            vendor_id: "user_2".into(),
            vendor_name: "Jogja Transport".into(),
            name: "Sewa Hiace 12 Jam".into(),
            price: 1_200_000,
            category: Category::Transport,
            image: DEFAULT_PRODUCT_IMAGE.into(),
            description: String::new(),
            stock: 5,
            variants: vec!["Lepas Kunci".into(), "Dengan Supir".into()],
        };
        assert!(product.offers_variant(Some("Dengan Supir")));
        assert!(!product.offers_variant(Some("Tanpa Bensin")));
        assert!(!product.offers_variant(None));

        product.variants.clear();
        assert!(product.offers_variant(None));
    }
}
