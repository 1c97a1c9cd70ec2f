pub mod feature;
pub mod interval_table;
pub mod region;
pub mod strand;

// re-export for cleaner imports
pub use self::feature::{FEATURE_ROW_HEADER, FeatureRecord, FeatureRow};
pub use self::interval_table::{DEFAULT_EXCLUDED_CHROMOSOMES, IntervalTable};
pub use self::region::Region;
pub use self::strand::Strand;
