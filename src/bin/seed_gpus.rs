//! Seed the catalog with the reference GPU lineup.
//!
//! Creates one gpu per (board partner, chip) pair with a placeholder ASIN
//! and 31 days of synthetic daily prices. Existing gpus (by name) are left
//! alone, so the seeder can be re-run.

use std::env;

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use gpu_price_tracker::entities::{gpus, prelude::*};
use gpu_price_tracker::services::price_history;

const NVIDIA_PARTNERS: [&str; 17] = [
    "ASUS ROG STRIX", "ASUS TUF Gaming", "ASUS DUAL", "MSI SUPRIM X", "MSI GAMING X TRIO",
    "MSI VENTUS 3X", "GIGABYTE AORUS Master", "GIGABYTE GAMING OC", "GIGABYTE EAGLE OC",
    "ZOTAC GAMING Trinity", "ZOTAC GAMING AMP", "PALIT GameRock", "PALIT JetStream",
    "GAINWARD Phantom", "ELSA S.A.C", "Colorful iGame Ultra", "INNO3D iCHILL X3",
];

const AMD_PARTNERS: [&str; 14] = [
    "SAPPHIRE NITRO+", "SAPPHIRE PULSE", "PowerColor Red Devil", "PowerColor Hellhound",
    "XFX MERC 310", "XFX SWFT 309", "ASRock Taichi", "ASRock Phantom Gaming", "ASUS ROG STRIX",
    "ASUS TUF Gaming", "MSI GAMING X TRIO", "MSI MECH", "GIGABYTE GAMING OC", "GIGABYTE EAGLE",
];

const INTEL_PARTNERS: [&str; 3] = ["ASRock Phantom Gaming", "SPARKLE Titan", "SPARKLE Elf"];

struct BaseGpu {
    series: &'static str,
    manufacturer: &'static str,
    vram: i32,
    score: i32,
    base_price: i32,
    partners: Vec<&'static str>,
}

fn base(
    series: &'static str,
    manufacturer: &'static str,
    vram: i32,
    score: i32,
    base_price: i32,
    partners: &[&'static str],
) -> BaseGpu {
    BaseGpu {
        series,
        manufacturer,
        vram,
        score,
        base_price,
        partners: partners.to_vec(),
    }
}

fn lineup() -> Vec<BaseGpu> {
    let nv = &NVIDIA_PARTNERS;
    let amd = &AMD_PARTNERS;
    let intel_plus = |extra: &[&'static str]| -> Vec<&'static str> {
        INTEL_PARTNERS.iter().copied().chain(extra.iter().copied()).collect()
    };

    vec![
        // NVIDIA RTX 50
        base("RTX 5090", "NVIDIA", 32, 5437, 398_000, &nv[..10]),
        base("RTX 5080", "NVIDIA", 16, 4996, 228_000, &nv[..12]),
        base("RTX 5070 Ti", "NVIDIA", 16, 4507, 168_000, &nv[..13]),
        base("RTX 5070", "NVIDIA", 12, 3973, 118_000, &nv[..14]),
        // NVIDIA RTX 40
        base("RTX 4090", "NVIDIA", 24, 5248, 298_000, &nv[..10]),
        base("RTX 4080 SUPER", "NVIDIA", 16, 4831, 178_000, &nv[..11]),
        base("RTX 4080", "NVIDIA", 16, 4725, 168_000, &nv[..11]),
        base("RTX 4070 Ti SUPER", "NVIDIA", 16, 4500, 138_000, &nv[..13]),
        base("RTX 4070 Ti", "NVIDIA", 12, 4311, 128_000, &nv[..13]),
        base("RTX 4070 SUPER", "NVIDIA", 12, 4245, 108_000, &nv[..13]),
        base("RTX 4070", "NVIDIA", 12, 3666, 88_000, &nv[..11]),
        base("RTX 4060 Ti 16GB", "NVIDIA", 16, 3171, 72_000, &nv[..9]),
        base("RTX 4060 Ti 8GB", "NVIDIA", 8, 3091, 62_000, &nv[..11]),
        base("RTX 4060", "NVIDIA", 8, 2703, 45_000, &nv[..11]),
        // NVIDIA RTX 30 (previous generation stock)
        base("RTX 3090 Ti", "NVIDIA", 24, 3200, 198_000, &["ASUS ROG STRIX", "MSI SUPRIM X", "GIGABYTE AORUS Master", "ZOTAC GAMING Trinity"]),
        base("RTX 3090", "NVIDIA", 24, 3050, 178_000, &["ASUS TUF Gaming", "MSI GAMING X TRIO", "GIGABYTE GAMING OC", "ZOTAC GAMING AMP", "PALIT GameRock"]),
        base("RTX 3080 Ti", "NVIDIA", 12, 2950, 128_000, &["ASUS ROG STRIX", "MSI SUPRIM X", "GIGABYTE AORUS Master", "ZOTAC GAMING Trinity", "PALIT GameRock"]),
        base("RTX 3080 10GB", "NVIDIA", 10, 2800, 98_000, &["ASUS TUF Gaming", "MSI VENTUS 3X", "GIGABYTE EAGLE OC", "ZOTAC GAMING Trinity"]),
        base("RTX 3070 Ti", "NVIDIA", 8, 2500, 78_000, &["ASUS ROG STRIX", "MSI GAMING X TRIO", "GIGABYTE GAMING OC"]),
        base("RTX 3070", "NVIDIA", 8, 2350, 68_000, &["ASUS DUAL", "MSI VENTUS 3X", "GIGABYTE EAGLE OC", "ZOTAC GAMING AMP"]),
        base("RTX 3060 Ti", "NVIDIA", 8, 2150, 52_000, &["ASUS TUF Gaming", "MSI GAMING X TRIO", "GIGABYTE GAMING OC", "PALIT JetStream"]),
        base("RTX 3060 12GB", "NVIDIA", 12, 1800, 42_000, &["ASUS DUAL", "MSI VENTUS 3X", "GIGABYTE EAGLE OC", "ZOTAC GAMING AMP", "PALIT JetStream"]),
        // AMD RX 9000
        base("RX 9070 XT", "AMD", 16, 3663, 108_000, &amd[..8]),
        base("RX 9070", "AMD", 16, 3467, 88_000, &amd[..8]),
        // AMD RX 7000
        base("RX 7900 XTX", "AMD", 24, 4314, 148_000, &amd[..8]),
        base("RX 7900 XT", "AMD", 20, 3877, 118_000, &amd[..8]),
        base("RX 7900 GRE", "AMD", 16, 3355, 88_000, &amd[..6]),
        base("RX 7800 XT", "AMD", 16, 3355, 75_000, &amd[..10]),
        base("RX 7700 XT", "AMD", 12, 2754, 62_000, &amd[..8]),
        base("RX 7600 XT", "AMD", 16, 2529, 48_000, &amd[..6]),
        base("RX 7600", "AMD", 8, 2127, 38_000, &amd[..8]),
        // AMD RX 6000 (previous generation)
        base("RX 6950 XT", "AMD", 16, 2900, 98_000, &["SAPPHIRE NITRO+", "PowerColor Red Devil", "XFX MERC 310", "ASRock Phantom Gaming"]),
        base("RX 6800 XT", "AMD", 16, 2650, 72_000, &["SAPPHIRE NITRO+", "PowerColor Red Devil", "ASUS ROG STRIX", "MSI GAMING X TRIO"]),
        base("RX 6800", "AMD", 16, 2400, 62_000, &["SAPPHIRE PULSE", "PowerColor Hellhound", "ASRock Phantom Gaming"]),
        base("RX 6750 XT", "AMD", 12, 2100, 48_000, &["SAPPHIRE NITRO+", "PowerColor Red Devil", "XFX SWFT 309"]),
        base("RX 6700 XT", "AMD", 12, 1950, 42_000, &["SAPPHIRE PULSE", "PowerColor Hellhound", "MSI MECH", "GIGABYTE EAGLE"]),
        base("RX 6650 XT", "AMD", 8, 1750, 32_000, &["SAPPHIRE PULSE", "PowerColor Hellhound", "XFX SWFT 309"]),
        // Intel Arc
        base("Arc B580", "Intel", 12, 2127, 38_000, &intel_plus(&["ASUS DUAL", "MSI GAMING X TRIO"])),
        base("Arc B570", "Intel", 10, 1838, 32_000, &intel_plus(&["ASUS DUAL"])),
        base("Arc A770 16GB", "Intel", 16, 1800, 42_000, &intel_plus(&["ASUS ROG STRIX"])),
        base("Arc A750", "Intel", 8, 1600, 28_000, &INTEL_PARTNERS),
    ]
}

/// Premium boards cost and score a little more than entry models.
fn partner_modifiers(partner: &str) -> (f64, f64) {
    const PREMIUM: [&str; 8] = ["ROG STRIX", "SUPRIM", "AORUS Master", "NITRO+", "Red Devil", "Taichi", "iGame Ultra", "iCHILL"];
    const MID: [&str; 5] = ["TUF Gaming", "GAMING X", "GameRock", "Phantom Gaming", "MERC"];
    const ENTRY: [&str; 9] = ["DUAL", "VENTUS", "EAGLE", "PULSE", "Hellhound", "SWFT", "MECH", "JetStream", "Elf"];

    let has_tag = |tags: &[&str]| tags.iter().any(|tag| partner.contains(tag));

    let price = if has_tag(&PREMIUM[..]) {
        1.14
    } else if has_tag(&MID[..]) {
        1.065
    } else if has_tag(&ENTRY[..]) {
        0.99
    } else {
        1.015
    };
    let score = if has_tag(&PREMIUM[..5]) || partner.contains("iCHILL") { 1.025 } else { 0.995 };

    (price, score)
}

/// Deterministic +-5% daily wobble
fn daily_variation(seed: usize, days_ago: i64) -> f64 {
    let step = (seed as i64 * 7 + days_ago * 13) % 21;
    (step - 10) as f64 / 200.0
}

fn placeholder_asin() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("B0{}", &hex[..8])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let db = Database::connect(env::var("DATABASE_URL")?).await?;
    migration::Migrator::up(&db, None).await?;

    println!("Seeding GPU catalog...");

    let mut created = 0usize;
    let mut histories = 0usize;
    let today = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .ok_or("invalid midnight")?
        .and_utc();

    for base in lineup() {
        for partner in &base.partners {
            let name = format!("{} {} {}", partner, base.manufacturer, base.series);

            let existing = Gpus::find()
                .filter(gpus::Column::Name.eq(&name))
                .one(&db)
                .await?;
            if existing.is_some() {
                continue;
            }

            let (price_mod, score_mod) = partner_modifiers(partner);
            let adjusted_price = (f64::from(base.base_price) * price_mod).round();
            let adjusted_score = (f64::from(base.score) * score_mod).round() as i32;
            let now = Utc::now().fixed_offset();

            let gpu = gpus::ActiveModel {
                name: Set(name.clone()),
                manufacturer: Set(Some(base.manufacturer.to_string())),
                series: Set(Some(base.series.to_string())),
                vram: Set(Some(base.vram)),
                benchmark_score: Set(Some(adjusted_score)),
                image_url: Set(None),
                amazon_asin: Set(Some(placeholder_asin())),
                current_price: Set(0),
                popularity: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&db)
            .await?;

            // Oldest first so the last write leaves today's price current
            for days_ago in (0..=30).rev() {
                let price = (adjusted_price * (1.0 + daily_variation(created, days_ago))).round() as i64;
                price_history::record_price_point(&db, gpu.id, price, today - Duration::days(days_ago)).await?;
                histories += 1;
            }

            created += 1;
            println!("  ✓ {}", name);
        }
    }

    println!("Created {} gpus and {} price history rows", created, histories);
    Ok(())
}
