pub mod key;
pub mod week;
