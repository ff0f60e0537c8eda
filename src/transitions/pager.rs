//! Horizontal step pager
//!
//! Each page move is its own off→on transition: the controller is re-based
//! to rest at 0 before the move starts and progress 1 means the neighbor
//! page has fully replaced the current one. The discrete step changes as
//! soon as a release commits; the renderer keeps drawing the move until the
//! spring settles.

use crate::{
    core::config::{ControllerConfig, TransitionProfile},
    input::gestures::GestureSample,
    transitions::controller::{Mode, ProgressDrivenTransitionController},
    Result, TransitionError,
};
use serde::{Deserialize, Serialize};

/// Which neighbor a page move reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMove {
    /// Dragging right reveals the previous page
    Back,
    /// Dragging left reveals the next page
    Next,
}

impl PageMove {
    pub fn from_translation(translation_x: f64) -> Option<Self> {
        if translation_x > 0.0 {
            Some(PageMove::Back)
        } else if translation_x < 0.0 {
            Some(PageMove::Next)
        } else {
            None
        }
    }

    /// Horizontal direction the outgoing page travels
    pub fn sign(&self) -> f64 {
        match self {
            PageMove::Back => 1.0,
            PageMove::Next => -1.0,
        }
    }
}

/// A page move in flight, for rendering both pages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageTransition {
    pub from: usize,
    pub to: usize,
    pub page_move: PageMove,
    /// How far `to` has replaced `from`. Unclamped.
    pub progress: f64,
}

impl PageTransition {
    /// Horizontal offset of the outgoing page
    pub fn from_offset(&self, width: f64) -> f64 {
        self.page_move.sign() * self.progress * width
    }

    /// Horizontal offset of the incoming page
    pub fn to_offset(&self, width: f64) -> f64 {
        self.from_offset(width) - self.page_move.sign() * width
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveMove {
    page_move: PageMove,
    from: usize,
}

#[derive(Debug)]
pub struct StepPager {
    count: usize,
    current: usize,
    width: f64,
    controller: ProgressDrivenTransitionController,
    active: Option<ActiveMove>,
}

impl StepPager {
    pub fn new(count: usize, width: f64) -> Result<Self> {
        Self::with_config(count, width, TransitionProfile::Sheet.resolve())
    }

    pub fn with_config(count: usize, width: f64, config: ControllerConfig) -> Result<Self> {
        if count == 0 {
            return Err(TransitionError::InvalidArgument(
                "a pager needs at least one step".to_string(),
            ));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(TransitionError::InvalidArgument(format!(
                "page width must be positive, got {}",
                width
            )));
        }

        Ok(Self {
            count,
            current: 0,
            width,
            controller: ProgressDrivenTransitionController::new(config)?,
            active: None,
        })
    }

    /// Follow a horizontal drag. The first non-zero translation picks the
    /// neighbor; drags toward a missing neighbor and drags while a move is
    /// still settling are ignored.
    pub fn drag(&mut self, translation_x: f64) -> Result<()> {
        let page_move = match (self.controller.mode(), self.active) {
            (Mode::Interactive, Some(active)) => active.page_move,
            (Mode::Idle, _) => {
                let Some(page_move) = PageMove::from_translation(translation_x) else {
                    return Ok(());
                };
                if self.neighbor(page_move).is_none() {
                    return Ok(());
                }
                self.controller.reset(false);
                self.controller.begin_interaction(false)?;
                self.active = Some(ActiveMove {
                    page_move,
                    from: self.current,
                });
                page_move
            }
            _ => return Ok(()),
        };

        self.controller
            .update_interaction(self.sample(page_move, translation_x))?;
        Ok(())
    }

    /// Release the drag. Returns the step the pager is heading to.
    pub fn end_drag(&mut self, translation_x: f64, velocity_x: f64) -> Result<usize> {
        let Some(active) = self.active else {
            return Ok(self.current);
        };
        if self.controller.mode() != Mode::Interactive {
            return Ok(self.current);
        }

        let release = self
            .sample(active.page_move, translation_x)
            .with_velocity(active.page_move.sign() * velocity_x);
        if self.controller.end_interaction(release)? {
            if let Some(step) = self.neighbor(active.page_move) {
                self.current = step;
            }
        }

        #[cfg(feature = "debug")]
        log::debug!("pager released, heading to step {}", self.current);

        Ok(self.current)
    }

    pub fn cancel_drag(&mut self) -> Result<()> {
        if self.controller.mode() == Mode::Interactive {
            self.controller.cancel_interaction()?;
        }
        Ok(())
    }

    /// Animate to the next step. Returns false at the last step or while a
    /// move is in progress.
    pub fn go_next(&mut self) -> Result<bool> {
        self.go(PageMove::Next)
    }

    /// Animate to the previous step. Returns false at the first step or
    /// while a move is in progress.
    pub fn go_back(&mut self) -> Result<bool> {
        self.go(PageMove::Back)
    }

    fn go(&mut self, page_move: PageMove) -> Result<bool> {
        if self.controller.mode() != Mode::Idle {
            return Ok(false);
        }
        let Some(step) = self.neighbor(page_move) else {
            return Ok(false);
        };

        self.controller.reset(false);
        self.controller.toggle(false)?;
        self.active = Some(ActiveMove {
            page_move,
            from: self.current,
        });
        self.current = step;
        Ok(true)
    }

    pub fn tick(&mut self, delta_time: f64) -> Result<Option<PageTransition>> {
        self.controller.tick(delta_time)?;
        if self.controller.mode() == Mode::Idle && self.active.take().is_some() {
            self.controller.reset(false);
        }
        Ok(self.transition())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.controller.set_paused(paused);
    }

    /// The move being dragged or animated, if any
    pub fn transition(&self) -> Option<PageTransition> {
        let active = self.active?;
        let to = match active.page_move {
            PageMove::Back => active.from.checked_sub(1)?,
            PageMove::Next => active.from + 1,
        };
        Some(PageTransition {
            from: active.from,
            to,
            page_move: active.page_move,
            progress: self.controller.value(),
        })
    }

    /// Signed horizontal offset of the page the move started from
    pub fn offset(&self) -> f64 {
        self.transition()
            .map(|transition| transition.from_offset(self.width))
            .unwrap_or(0.0)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn controller(&self) -> &ProgressDrivenTransitionController {
        &self.controller
    }

    fn neighbor(&self, page_move: PageMove) -> Option<usize> {
        match page_move {
            PageMove::Back => self.current.checked_sub(1),
            PageMove::Next => (self.current + 1 < self.count).then_some(self.current + 1),
        }
    }

    fn sample(&self, page_move: PageMove, translation_x: f64) -> GestureSample {
        GestureSample::new(page_move.sign() * translation_x, self.width)
    }
}
