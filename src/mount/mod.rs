pub mod inspect;
pub mod ops;

pub use ops::ensure_mounted;
