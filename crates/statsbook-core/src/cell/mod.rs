//! Cell addressing and cell values

mod address;
mod value;

pub use address::{Address, AddressRange, AddressRangeIter, Offset};
pub use value::{Value, ValueOrdering};
