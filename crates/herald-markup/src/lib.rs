//! # Herald Markup
//!
//! Normalizes legacy `&` color codes into canonical `<tag>` markup, measures
//! the on-screen width of a line while ignoring markup, and centers lines in
//! a fixed-width display.
//!
//! ```text
//! "<offset:-2>&6&lWelcome!"
//!   ├── extract_offset          → -2
//!   ├── strip_offset_directives → "&6&lWelcome!"
//!   ├── translate_legacy        → "<color:gold><b>Welcome!"
//!   ├── visible_width           → 8
//!   └── center(80, -2)          → 34 spaces + "<color:gold><b>Welcome!"
//! ```

pub mod center;
pub mod directive;
pub mod legacy;
pub mod palette;
pub mod placeholder;
pub mod render;
pub mod tags;
pub mod width;

pub use center::{center, leading_spaces};
pub use directive::{extract_offset, strip_offset_directives};
pub use legacy::translate_legacy;
pub use render::{RenderOptions, render, render_chat_line};
pub use width::{strip_all_markup, visible_width};
