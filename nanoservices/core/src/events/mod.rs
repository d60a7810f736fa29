pub mod bus;
pub mod interval;
pub mod trigger;
