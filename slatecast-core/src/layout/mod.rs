pub mod fit;
pub mod measure;
