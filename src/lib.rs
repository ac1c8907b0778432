//! Toast notifications that morph between a pill and a card.
//!
//! Toasts are built on a headless, retained [`Surface`]: a node document with a small layout
//! model, CSS-like property transitions and a virtual clock. The embedder advances the clock
//! and paints the document; the crate takes care of the rest:
//!
//! - entrance, auto-expand and auto-dismiss timers,
//! - the pill/card morph, measured against the body's natural height,
//! - swipe-to-dismiss with elastic resistance and a velocity-based commit.
//!
//! ```ignore
//! use pilltoast::prelude::*;
//!
//! let surface = Surface::new(SurfaceConfig::new());
//! let toaster = Toaster::new(surface.clone());
//! let toast = toaster.create(
//!     ToastOptions::new()
//!         .category(Category::Success)
//!         .title("Saved")
//!         .description("Your changes are live.")
//!         .auto_dismiss_after_ms(2_000),
//! );
//! surface.advance(5_000);
//! assert!(toast.is_dead());
//! ```

pub mod animation;
pub mod assets;
pub mod constants;
#[cfg(feature = "calloop")]
pub mod driver;
pub mod event;
pub mod measure;
pub mod scheduler;
pub mod style;
pub mod surface;
pub mod text_measurer;
pub mod toast;
pub mod transform;
pub mod tree;
pub mod viewport;

use thiserror::Error;

pub use surface::{Surface, SurfaceConfig};
pub use toast::{Category, Theme, ToastHandle, ToastOptions, ToastState, Toaster};

pub mod prelude {
    pub use crate::animation::{Transition, TimingFunction};
    pub use crate::event::{Event, EventKind, PointerEvent};
    pub use crate::style::{Color, Property};
    pub use crate::text_measurer::{FixedAdvanceMeasurer, TextMeasurer};
    pub use crate::toast::{
        Category, Theme, ToastHandle, ToastNodes, ToastOptions, ToastState, Toaster,
    };
    pub use crate::transform::Transform;
    pub use crate::tree::{Classes, Content, Document, NodeId};
    pub use crate::viewport::ViewportManager;
    pub use crate::{ParseError, Surface, SurfaceConfig};

    #[cfg(feature = "calloop")]
    pub use crate::driver::{Driver, DriverError};
}

/// Error returned when parsing option values from strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown toast category: {0}")]
    Category(String),
    #[error("Unknown theme: {0}")]
    Theme(String),
    #[error("Invalid color: {0}")]
    Color(String),
}
