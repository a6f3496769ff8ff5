pub mod attribute;
pub mod badge;
pub mod bucket;
pub mod estimate;
pub mod point;
pub mod series;
