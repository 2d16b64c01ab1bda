pub mod binarize;
pub mod thinning;
pub mod hit_or_miss;
pub mod junctions;
pub mod trace;
pub mod sampling;
pub mod width;

pub use binarize::*;
pub use thinning::*;
pub use hit_or_miss::*;
pub use junctions::*;
pub use trace::*;
pub use sampling::*;
pub use width::*;
