pub mod stock;
pub mod response;
pub mod upstream;

pub use stock::*;
pub use response::*;
