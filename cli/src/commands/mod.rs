//! Command implementations

pub mod dispatch;
pub mod instances;
pub mod invoke;
pub mod transfer;
pub mod version;
