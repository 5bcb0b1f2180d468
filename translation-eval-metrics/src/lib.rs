pub mod tokenizer;
pub mod edit_distance;
pub mod synonyms;
pub mod calculators;
pub mod aggregators;
pub mod statistical;
pub mod evaluator;

pub use tokenizer::*;
pub use edit_distance::*;
pub use synonyms::*;
pub use calculators::*;
pub use aggregators::*;
pub use statistical::*;
pub use evaluator::*;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
