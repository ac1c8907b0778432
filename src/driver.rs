//! Real-time driver: pumps a [`Surface`] from a calloop event loop.
//!
//! The surface clock is virtual; this driver ties it to wall time by advancing it on every
//! frame tick. Embedders with their own loop can call [`Surface::advance_to`] themselves
//! instead.

use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use thiserror::Error;

use crate::surface::Surface;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[source] calloop::Error),
    #[error("failed to register frame timer: {0}")]
    Timer(#[source] calloop::Error),
    #[error("event loop dispatch failed: {0}")]
    Dispatch(#[source] calloop::Error),
}

/// Callback run after each tick. Return `false` to stop the loop.
pub type TickCallback = Box<dyn FnMut(&Surface) -> bool>;

struct DriverState {
    surface: Rc<Surface>,
    started: Instant,
    signal: LoopSignal,
    on_tick: TickCallback,
}

pub struct Driver {
    surface: Rc<Surface>,
    on_tick: Option<TickCallback>,
}

impl Driver {
    pub fn new(surface: Rc<Surface>) -> Self {
        Self {
            surface,
            on_tick: None,
        }
    }

    /// Set a callback that gets called after the surface has been advanced each frame.
    /// Use it to paint, feed input, or stop the loop by returning `false`.
    pub fn on_tick<F: FnMut(&Surface) -> bool + 'static>(mut self, callback: F) -> Self {
        self.on_tick = Some(Box::new(callback));
        self
    }

    /// Run until the tick callback returns `false`, or until the surface goes idle when no
    /// callback is set.
    pub fn run(self) -> Result<(), DriverError> {
        let mut event_loop: EventLoop<'_, DriverState> =
            EventLoop::try_new().map_err(DriverError::EventLoop)?;
        let interval = Duration::from_millis(self.surface.scheduler().frame_interval());

        event_loop
            .handle()
            .insert_source(Timer::from_duration(interval), move |_, _, state| {
                let elapsed = state.started.elapsed().as_millis() as u64;
                state.surface.advance_to(elapsed);
                if !(state.on_tick)(&state.surface) {
                    log::debug!("Driver stopping at {}ms", elapsed);
                    state.signal.stop();
                }
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|e| DriverError::Timer(e.error))?;

        let on_tick = self.on_tick.unwrap_or_else(|| {
            Box::new(|surface: &Surface| !surface_is_idle(surface)) as TickCallback
        });
        let mut state = DriverState {
            surface: self.surface,
            started: Instant::now(),
            signal: event_loop.get_signal(),
            on_tick,
        };

        log::debug!("Driver running at {}ms per frame", interval.as_millis());
        event_loop
            .run(None, &mut state, |_| {})
            .map_err(DriverError::Dispatch)
    }
}

fn surface_is_idle(surface: &Surface) -> bool {
    !surface.scheduler().has_pending()
        && surface.with_document(|doc| doc.next_transition_end().is_none())
}
