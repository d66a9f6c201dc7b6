//! Volume with explicit subscribers.
//!
//! Volume is the one value pushed to the media handle automatically: every
//! committed change notifies each subscriber synchronously, in the order
//! they subscribed.

pub type SubscriptionId = usize;

pub struct VolumeBus {
    value: f32,
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(f32)>)>,
}

impl VolumeBus {
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial.clamp(0.0, 1.0),
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(f32) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    #[cfg(test)]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Store `value` (clamped to 0..=1) and notify subscribers.
    /// Returns `false` without notifying when nothing changed or `value` is NaN.
    pub fn commit(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = value.clamp(0.0, 1.0);
        if value == self.value {
            return false;
        }
        self.value = value;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(value);
        }
        true
    }
}
