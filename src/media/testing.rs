//! Recording `MediaHandle` for controller and view tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::types::{LoadId, MediaHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String, LoadId),
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
}

/// Clones share one call log, like clones of a real handle share one thread.
#[derive(Debug, Clone, Default)]
pub struct FakeMedia {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeMedia {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Return and forget the calls recorded so far.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn last_load(&self) -> Option<(String, LoadId)> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::Load(url, load) => Some((url.clone(), *load)),
            _ => None,
        })
    }
}

impl MediaHandle for FakeMedia {
    fn load(&mut self, url: &str, load: LoadId) {
        self.calls.borrow_mut().push(Call::Load(url.to_string(), load));
    }

    fn play(&mut self) {
        self.calls.borrow_mut().push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.borrow_mut().push(Call::Volume(volume));
    }
}
