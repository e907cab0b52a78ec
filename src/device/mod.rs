//! Device control
//!
//! The turn controller only needs four things from a device: take a
//! screenshot, hand it over decoded, perform a swipe and shut its session
//! down. [`AdbController`] does this over adb, [`ReplayController`] plays back
//! saved screenshots for offline runs.

pub mod adb;
pub mod replay;

pub use adb::AdbController;
pub use replay::ReplayController;

use crate::planner::Swipe;
use crate::vision::Screenshot;
use crate::Result;

/// Operations the turn loop needs from a device
pub trait DeviceController {
    /// Capture the current screen into the device-side artifact
    fn capture_screen(&mut self) -> Result<()>;

    /// Retrieve and decode the last captured screen
    fn fetch_screen(&mut self) -> Result<Screenshot>;

    /// Perform a swipe (a press when start and end are close)
    fn swipe(&mut self, swipe: &Swipe) -> Result<()>;

    /// Stop any background session; safe to call more than once
    fn shutdown(&mut self) -> Result<()>;

    /// Capture and retrieve in one step
    fn screenshot(&mut self) -> Result<Screenshot> {
        self.capture_screen()?;
        self.fetch_screen()
    }
}

impl<D: DeviceController + ?Sized> DeviceController for Box<D> {
    fn capture_screen(&mut self) -> Result<()> {
        (**self).capture_screen()
    }

    fn fetch_screen(&mut self) -> Result<Screenshot> {
        (**self).fetch_screen()
    }

    fn swipe(&mut self, swipe: &Swipe) -> Result<()> {
        (**self).swipe(swipe)
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}
