//! Vantage Studio Model
//!
//! Defines the data contracts the rendering pipeline consumes:
//! - **Devices:** Immutable geometry profiles for every supported device
//! - **Theme:** Colors, gradient, finish, template, and device selection
//! - **Screenshots:** Per-asset copy and image references
//! - **Session:** The single owned editing aggregate and its update operations
//!
//! Nothing here renders. Everything here is data plus the rules that keep
//! it consistent.

pub mod color;
pub mod copywriting;
pub mod device;
pub mod image_source;
pub mod screenshot;
pub mod session;
pub mod theme;

pub use color::*;
pub use copywriting::*;
pub use device::*;
pub use image_source::*;
pub use screenshot::*;
pub use session::*;
pub use theme::*;
