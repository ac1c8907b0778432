//! Timing, geometry and gesture constants to avoid magic numbers throughout the codebase.

// Lifecycle timing

/// Default delay before a toast with a body expands on its own.
pub const DEFAULT_EXPAND_DELAY_MS: u64 = 800;

/// Default pause between starting a collapse and shrinking the body to zero.
pub const DEFAULT_COLLAPSE_TRANSITION_MS: u64 = 250;

/// Duration of the pill-to-card morph.
///
/// Auto-dismiss of a toast with a body is scheduled at
/// `expand_delay + EXPAND_TRANSITION_MS + auto_dismiss_after`, so the dismissal never lands
/// in the middle of the expansion.
pub const EXPAND_TRANSITION_MS: u64 = 600;

/// How long the collapsing marker stays on after the body height reaches zero.
pub const COLLAPSE_SETTLE_MS: u64 = 550;

/// Duration of the wrapper max-height collapse on dismissal.
pub const EXIT_COLLAPSE_MS: u64 = 400;

/// Delay before a dismissed wrapper is detached from the viewport.
pub const DISMISS_REMOVE_MS: u64 = 500;

/// Delay before a swiped-away wrapper is detached from the viewport.
pub const SWIPE_REMOVE_MS: u64 = 450;

/// Transition applied to the accent background while morphing.
pub const MORPH_TRANSITION_MS: u64 = 600;

/// Transition applied to the body wrapper height.
pub const BODY_TRANSITION_MS: u64 = 500;

// Geometry

/// Height of the title bar, which is also the height of the pill.
pub const HEADER_HEIGHT: f32 = 48.0;

/// Corner radius of the pill; large enough to be fully rounded at [`HEADER_HEIGHT`].
pub const PILL_RADIUS: f32 = 50.0;

/// Corner radius of the expanded card.
pub const CARD_RADIUS: f32 = 24.0;

/// Width of a toast card.
pub const TOAST_WIDTH: f32 = 360.0;

/// Side length of the icon slot.
pub const ICON_SIZE: f32 = 22.0;

/// Horizontal padding of the title bar.
pub const HEADER_PADDING_X: f32 = 14.0;

/// Gap between the icon and the title.
pub const HEADER_GAP: f32 = 8.0;

/// Padding around the body content.
pub const BODY_PADDING: f32 = 14.0;

/// Gap between body content items.
pub const BODY_GAP: f32 = 10.0;

/// Title font size.
pub const TITLE_FONT_SIZE: f32 = 14.0;

/// Body font size.
pub const BODY_FONT_SIZE: f32 = 13.0;

/// Height of the action button.
pub const BUTTON_HEIGHT: f32 = 34.0;

// Gesture

/// Upward drag distance that commits a dismissal regardless of speed.
pub const SWIPE_THRESHOLD: f32 = 60.0;

/// Minimum upward drag distance for a flick to commit.
pub const SWIPE_FLICK_MIN_DISTANCE: f32 = 20.0;

/// Flick velocity, in offset units per millisecond, above which a short drag commits.
pub const SWIPE_DISMISS_VELOCITY: f32 = 0.5;

/// Fraction of downward displacement that passes through (elastic resistance).
pub const SWIPE_DOWNWARD_DAMPING: f32 = 0.2;

/// Upward distance at which the drag feedback saturates.
pub const SWIPE_PROGRESS_DISTANCE: f32 = 150.0;

/// Opacity lost at full drag progress.
pub const SWIPE_OPACITY_FALLOFF: f32 = 0.6;

/// Scale lost at full drag progress.
pub const SWIPE_SCALE_FALLOFF: f32 = 0.08;

/// Extra distance a committed toast travels upward.
pub const SWIPE_EXIT_OVERSHOOT: f32 = 80.0;

/// Scale a committed toast shrinks to.
pub const SWIPE_EXIT_SCALE: f32 = 0.85;

/// Transform transition of a committed toast.
pub const SWIPE_EXIT_TRANSFORM_MS: u64 = 250;

/// Opacity transition of a committed toast.
pub const SWIPE_EXIT_OPACITY_MS: u64 = 200;

/// Delay between a committed swipe and the wrapper collapse.
pub const SWIPE_COMMIT_DELAY_MS: u64 = 150;

/// Snap-back transition duration.
pub const SNAP_BACK_MS: u64 = 300;

/// Fallback after which snap-back overrides are cleared even without a `transitionend`.
pub const SNAP_BACK_CLEANUP_MS: u64 = 500;

// Host

/// Default frame interval of a [`Surface`](crate::Surface) (about 60Hz).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Default width of the document viewport.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;

/// Coordinate used to push measurement probes out of the visible area.
pub const OFFSCREEN_COORDINATE: f32 = -9999.0;
