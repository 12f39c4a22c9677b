pub mod item;
pub mod scope;
pub mod view;

pub use item::*;
pub use scope::*;
pub use view::*;
