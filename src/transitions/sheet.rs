//! Drag-to-dismiss modal sheet
//!
//! The sheet's controller works in the "presented" frame: position 1 means
//! fully on screen, 0 means fully below the bottom edge. Dragging down is a
//! dismissal attempt, so vertical translations are fed with their sign
//! flipped.

use crate::{
    core::config::{ControllerConfig, TransitionProfile},
    input::gestures::GestureSample,
    transitions::controller::{Mode, ProgressDrivenTransitionController},
    Result, TransitionError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the sheet is doing, reported to observers whenever it changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetState {
    /// On screen in any way, including mid-dismissal
    pub is_presented: bool,
    pub is_dragging: bool,
    pub is_being_presented: bool,
    pub is_being_dismissed: bool,
}

pub type SheetStateListener = Box<dyn Fn(&SheetState) + Send + Sync>;

pub struct SheetPresentation {
    controller: ProgressDrivenTransitionController,
    /// Distance the sheet travels between hidden and presented
    extent: f64,
    /// Discrete state: presented, or on its way to being presented
    shown: bool,
    last_state: SheetState,
    on_state_changed: Option<SheetStateListener>,
}

impl SheetPresentation {
    /// A hidden sheet travelling `extent` points, with the sheet profile
    pub fn new(extent: f64) -> Result<Self> {
        Self::with_config(extent, TransitionProfile::Sheet.resolve())
    }

    pub fn with_config(extent: f64, config: ControllerConfig) -> Result<Self> {
        check_extent(extent)?;
        Ok(Self {
            controller: ProgressDrivenTransitionController::new(config)?,
            extent,
            shown: false,
            last_state: SheetState::default(),
            on_state_changed: None,
        })
    }

    pub fn on_state_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SheetState) + Send + Sync + 'static,
    {
        self.on_state_changed = Some(Box::new(callback));
        self
    }

    /// Slide the sheet in. Does nothing if it is already presented.
    pub fn present(&mut self) -> Result<()> {
        if self.shown {
            return Ok(());
        }
        self.controller.toggle(false)?;
        self.shown = true;
        self.publish();
        Ok(())
    }

    /// Slide the sheet out, e.g. from a close button. A drag in progress
    /// is dropped and the sheet leaves from where the finger held it.
    pub fn dismiss(&mut self) -> Result<()> {
        if !self.shown {
            return Ok(());
        }
        if self.controller.mode() == Mode::Interactive {
            self.controller.cancel_interaction()?;
        }
        self.controller.toggle(true)?;
        self.shown = false;
        self.publish();
        Ok(())
    }

    /// Follow a vertical drag, `translation_y` growing downwards.
    ///
    /// A sheet that is hidden or leaving ignores drags. Grabbing a sheet
    /// mid-presentation catches it where it is.
    pub fn drag(&mut self, translation_y: f64) -> Result<()> {
        if !self.shown {
            return Ok(());
        }
        if self.controller.mode() != Mode::Interactive {
            self.controller.begin_interaction(true)?;
        }
        self.controller
            .update_interaction(GestureSample::new(-translation_y, self.extent))?;
        self.publish();
        Ok(())
    }

    /// Release the drag. Returns true when the sheet is being dismissed.
    pub fn end_drag(&mut self, translation_y: f64, velocity_y: f64) -> Result<bool> {
        if self.controller.mode() != Mode::Interactive {
            return Ok(false);
        }

        let release = GestureSample::new(-translation_y, self.extent).with_velocity(-velocity_y);
        let dismissed = self.controller.end_interaction(release)?;
        if dismissed {
            self.shown = false;
        }

        #[cfg(feature = "debug")]
        log::debug!(
            "sheet released at {:.1}: {}",
            translation_y,
            if dismissed { "dismissing" } else { "snapping back" }
        );

        self.publish();
        Ok(dismissed)
    }

    /// The platform took the drag away; snap back to presented
    pub fn cancel_drag(&mut self) -> Result<()> {
        if self.controller.mode() == Mode::Interactive {
            self.controller.cancel_interaction()?;
            self.publish();
        }
        Ok(())
    }

    pub fn tick(&mut self, delta_time: f64) -> Result<SheetState> {
        self.controller.tick(delta_time)?;
        self.publish();
        Ok(self.last_state)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.controller.set_paused(paused);
    }

    /// Update the travel distance, e.g. after rotation
    pub fn set_extent(&mut self, extent: f64) -> Result<()> {
        check_extent(extent)?;
        self.extent = extent;
        Ok(())
    }

    pub fn state(&self) -> SheetState {
        let settling = self.controller.mode() == Mode::Settling;
        SheetState {
            is_presented: self.shown || self.controller.mode() != Mode::Idle,
            is_dragging: self.controller.mode() == Mode::Interactive,
            is_being_presented: settling
                && self.shown
                && self.controller.pending_commit() == Some(true),
            is_being_dismissed: settling && !self.shown,
        }
    }

    /// 1 when fully presented, 0 when hidden. Overshoots while dragged up.
    pub fn presentation(&self) -> f64 {
        self.controller.position()
    }

    /// Vertical offset of the sheet from its presented resting place
    pub fn offset(&self) -> f64 {
        (1.0 - self.presentation()) * self.extent
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn controller(&self) -> &ProgressDrivenTransitionController {
        &self.controller
    }

    fn publish(&mut self) {
        let state = self.state();
        if state == self.last_state {
            return;
        }
        self.last_state = state;

        #[cfg(feature = "debug")]
        log::trace!("sheet state {:?}", state);

        if let Some(callback) = &self.on_state_changed {
            callback(&state);
        }
    }
}

fn check_extent(extent: f64) -> Result<()> {
    if extent.is_finite() && extent > 0.0 {
        Ok(())
    } else {
        Err(TransitionError::InvalidArgument(format!(
            "sheet extent must be positive, got {}",
            extent
        )))
    }
}

impl fmt::Debug for SheetPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetPresentation")
            .field("controller", &self.controller)
            .field("extent", &self.extent)
            .field("state", &self.last_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const DT: f64 = 1.0 / 60.0;

    fn run_until_idle(sheet: &mut SheetPresentation) {
        for _ in 0..600 {
            if sheet.controller().mode() == Mode::Idle {
                return;
            }
            sheet.tick(DT).unwrap();
        }
        panic!("sheet never settled");
    }

    fn presented_sheet() -> SheetPresentation {
        let mut sheet = SheetPresentation::new(800.0).unwrap();
        sheet.present().unwrap();
        run_until_idle(&mut sheet);
        sheet
    }

    #[test]
    fn test_present_slides_in() {
        let mut sheet = SheetPresentation::new(800.0).unwrap();
        assert_eq!(sheet.offset(), 800.0);

        sheet.present().unwrap();
        assert!(sheet.state().is_being_presented);
        assert!(sheet.state().is_presented);

        run_until_idle(&mut sheet);
        assert_eq!(sheet.offset(), 0.0);
        assert_eq!(
            sheet.state(),
            SheetState {
                is_presented: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut sheet = presented_sheet();
        sheet.drag(100.0).unwrap();
        assert!(sheet.state().is_dragging);
        assert!((sheet.offset() - 100.0).abs() < 1e-9);

        assert!(!sheet.end_drag(150.0, 0.0).unwrap());
        assert!(!sheet.state().is_being_dismissed);
        run_until_idle(&mut sheet);

        assert!(sheet.state().is_presented);
        assert_eq!(sheet.offset(), 0.0);
    }

    #[test]
    fn test_long_drag_dismisses_after_settle() {
        let mut sheet = presented_sheet();
        sheet.drag(300.0).unwrap();
        assert!(sheet.end_drag(500.0, 0.0).unwrap());

        let state = sheet.tick(DT).unwrap();
        assert!(state.is_presented);
        assert!(state.is_being_dismissed);

        run_until_idle(&mut sheet);
        assert!(!sheet.state().is_presented);
        assert_eq!(sheet.offset(), 800.0);
    }

    #[test]
    fn test_fast_flick_dismisses_short_drag() {
        let mut sheet = presented_sheet();
        sheet.drag(80.0).unwrap();
        assert!(sheet.end_drag(120.0, 2400.0).unwrap());
    }

    #[test]
    fn test_upward_drag_overshoots() {
        let mut sheet = presented_sheet();
        sheet.drag(-40.0).unwrap();
        assert!((sheet.offset() + 40.0).abs() < 1e-9);
        assert!(sheet.presentation() > 1.0);
    }

    #[test]
    fn test_hidden_sheet_ignores_drags() {
        let mut sheet = SheetPresentation::new(800.0).unwrap();
        sheet.drag(100.0).unwrap();
        assert_eq!(sheet.controller().mode(), Mode::Idle);
        assert!(!sheet.end_drag(100.0, 0.0).unwrap());
    }

    #[test]
    fn test_state_changes_are_reported_once_each() {
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);
        let mut sheet = SheetPresentation::new(600.0)
            .unwrap()
            .on_state_changed(move |state| sink.lock().unwrap().push(*state));

        sheet.present().unwrap();
        run_until_idle(&mut sheet);
        sheet.dismiss().unwrap();
        run_until_idle(&mut sheet);

        let states = states.lock().unwrap();
        assert_eq!(states.len(), 4);
        assert!(states[0].is_being_presented);
        assert_eq!(
            states[1],
            SheetState {
                is_presented: true,
                ..Default::default()
            }
        );
        assert!(states[2].is_being_dismissed);
        assert_eq!(states[3], SheetState::default());
    }

    #[test]
    fn test_cancelled_drag_snaps_back() {
        let mut sheet = presented_sheet();
        sheet.drag(300.0).unwrap();
        sheet.cancel_drag().unwrap();
        assert!(!sheet.state().is_dragging);
        assert!(!sheet.state().is_being_dismissed);

        run_until_idle(&mut sheet);
        assert!(sheet.state().is_presented);
        assert_eq!(sheet.offset(), 0.0);
    }

    #[test]
    fn test_dismiss_during_drag() {
        let mut sheet = presented_sheet();
        sheet.drag(120.0).unwrap();
        let offset = sheet.offset();

        sheet.dismiss().unwrap();
        assert!((sheet.offset() - offset).abs() < 1e-9);
        assert!(sheet.state().is_being_dismissed);
        assert!(!sheet.state().is_dragging);

        run_until_idle(&mut sheet);
        assert!(!sheet.state().is_presented);
        assert_eq!(sheet.offset(), 800.0);
    }

    #[test]
    fn test_invalid_extent() {
        assert!(SheetPresentation::new(0.0).is_err());
        let mut sheet = SheetPresentation::new(100.0).unwrap();
        assert!(sheet.set_extent(f64::INFINITY).is_err());
        assert_eq!(sheet.extent(), 100.0);
    }
}
