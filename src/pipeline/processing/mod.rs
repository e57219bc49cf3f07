// Pipeline processing: cleaning, normalization, grouping, merging, and filtering

pub mod clean;
pub mod filter;
pub mod grouping;
pub mod merge;
pub mod normalize;

pub use filter::HotelFilter;
pub use grouping::Bucket;
