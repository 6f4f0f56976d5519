pub mod gpu_price_sync;
pub mod pacing;
