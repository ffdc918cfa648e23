pub mod location;
pub mod ride;
pub mod order;
pub mod user;

pub use location::*;
pub use ride::*;
pub use order::*;
pub use user::*;
