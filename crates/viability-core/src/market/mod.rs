pub mod benchmarks;
pub mod suggest;

pub use benchmarks::{Band, TaxRegime};
pub use suggest::{suggest_study, suggested_sales_table};
