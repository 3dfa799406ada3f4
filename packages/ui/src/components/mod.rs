//! Form building blocks shared by every screen.

mod button;
mod input;

pub use button::{Button, ButtonVariant};
pub use input::TextInput;
