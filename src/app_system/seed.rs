//! The demo data the cooperative ships with: four members, two products,
//! one open request and one pending offer on it.

use tracing::{info, instrument};

use super::{KoperasiSystem, SystemError};
use crate::domain::{
    parse_variants, Category, OfferCreate, ProductCreate, RequestCreate, Role, UserCreate,
};

pub const DEMO_PASSWORD: &str = "123";
pub const ADMIN_EMAIL: &str = "admin@koperasi.id";
pub const BALI_VENDOR_EMAIL: &str = "vendor@bali.id";
pub const JOGJA_VENDOR_EMAIL: &str = "vendor@jogja.id";
pub const BUYER_EMAIL: &str = "budi@gmail.com";

/// Ids of the seeded records the demo walk-through refers back to.
#[derive(Debug, Clone)]
pub struct DemoData {
    pub nusa_penida: String,
    pub hiace: String,
    pub request_id: String,
    pub offer_id: String,
}

#[instrument(skip(system))]
pub async fn seed_demo(system: &KoperasiSystem) -> Result<DemoData, SystemError> {
    let members = [
        UserCreate::new("Admin Koperasi", ADMIN_EMAIL, DEMO_PASSWORD, Role::Admin),
        UserCreate::new("Bali Tour Travel", BALI_VENDOR_EMAIL, DEMO_PASSWORD, Role::Vendor)
            .with_location("Denpasar"),
        UserCreate::new("Jogja Transport", JOGJA_VENDOR_EMAIL, DEMO_PASSWORD, Role::Vendor)
            .with_location("Yogyakarta"),
        UserCreate::new("Budi Wisatawan", BUYER_EMAIL, DEMO_PASSWORD, Role::Buyer),
    ];
    for member in members {
        system.identity.register(member).await?;
    }

    let bali = system.identity.login(BALI_VENDOR_EMAIL, DEMO_PASSWORD).await?;
    let jogja = system.identity.login(JOGJA_VENDOR_EMAIL, DEMO_PASSWORD).await?;
    let budi = system.identity.login(BUYER_EMAIL, DEMO_PASSWORD).await?;

    let nusa_penida = system
        .market
        .create_product(
            bali.clone(),
            ProductCreate::new("Paket Tour Nusa Penida 1 Hari", 750_000, 20)
                .category(Category::Tour)
                .image("https://images.unsplash.com/photo-1596395818837-29e71072930e?auto=format&fit=crop&q=80&w=400")
                .description("All in termasuk speed boat dan makan siang.")
                .variants(parse_variants("Pagi (08:00), Siang (11:00)")),
        )
        .await?;

    let hiace = system
        .market
        .create_product(
            jogja,
            ProductCreate::new("Sewa Hiace 12 Jam", 1_200_000, 5)
                .category(Category::Transport)
                .image("https://images.unsplash.com/photo-1568605117036-5fe5e7bab0b7?auto=format&fit=crop&q=80&w=400")
                .description("Mobil bersih, driver ramah, bbm included.")
                .variants(parse_variants("Lepas Kunci, Dengan Supir")),
        )
        .await?;

    let request_id = system
        .market
        .post_request(
            budi,
            RequestCreate::new(
                "Tiket Pesawat Jakarta - Bali (Grup)",
                "Butuh tiket untuk 10 orang keberangkatan tgl 20 Des. Budget max 1.5jt/org.",
                15_000_000,
            ),
        )
        .await?;

    let offer_id = system
        .market
        .submit_offer(
            bali,
            request_id.clone(),
            OfferCreate::new(
                14_500_000,
                "Halo Pak Budi, kami bisa provide Batik Air jam 10 pagi. Total 14.5jt.",
            ),
        )
        .await?;

    info!(%nusa_penida, %hiace, %request_id, %offer_id, "Demo data seeded");
    Ok(DemoData {
        nusa_penida,
        hiace,
        request_id,
        offer_id,
    })
}
