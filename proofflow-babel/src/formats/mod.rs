//! Format implementations

pub mod dialect;
pub mod treeviz;

pub use dialect::DialectFormat;
pub use treeviz::TreevizFormat;
