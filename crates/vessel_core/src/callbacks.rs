//! Single-slot event subscriptions
//!
//! Each event category has exactly one slot. Setting a handler replaces the
//! previous one; setting `None` unsubscribes. The registry itself is not
//! synchronized: it lives inside the runtime's exclusion domain, so
//! subscription changes and dispatch never interleave.

use vessel_platform::{AccelerometerSample, TextInput, TouchEvent};

/// Receives touch events
pub trait TouchHandler: Send {
    fn on_touch(&mut self, event: TouchEvent);
}

impl<F> TouchHandler for F
where
    F: FnMut(TouchEvent) + Send,
{
    fn on_touch(&mut self, event: TouchEvent) {
        self(event)
    }
}

/// Receives text input
pub trait TextHandler: Send {
    fn on_text(&mut self, input: &TextInput);
}

impl<F> TextHandler for F
where
    F: FnMut(&TextInput) + Send,
{
    fn on_text(&mut self, input: &TextInput) {
        self(input)
    }
}

/// Receives accelerometer samples
pub trait AccelerometerHandler: Send {
    fn on_accelerometer(&mut self, sample: AccelerometerSample);
}

impl<F> AccelerometerHandler for F
where
    F: FnMut(AccelerometerSample) + Send,
{
    fn on_accelerometer(&mut self, sample: AccelerometerSample) {
        self(sample)
    }
}

/// Event category with its own subscription slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Touch,
    Text,
    Accelerometer,
}

/// One subscriber slot per event category
#[derive(Default)]
pub struct CallbackRegistry {
    touch: Option<Box<dyn TouchHandler>>,
    text: Option<Box<dyn TextHandler>>,
    accelerometer: Option<Box<dyn AccelerometerHandler>>,
}

impl CallbackRegistry {
    /// Create a registry with every slot empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the touch subscriber (`None` unsubscribes)
    pub fn set_touch(&mut self, handler: Option<Box<dyn TouchHandler>>) {
        self.touch = handler;
    }

    /// Replace the text subscriber (`None` unsubscribes)
    pub fn set_text(&mut self, handler: Option<Box<dyn TextHandler>>) {
        self.text = handler;
    }

    /// Replace the accelerometer subscriber (`None` unsubscribes)
    pub fn set_accelerometer(&mut self, handler: Option<Box<dyn AccelerometerHandler>>) {
        self.accelerometer = handler;
    }

    /// Empty a slot
    pub fn clear(&mut self, category: EventCategory) {
        match category {
            EventCategory::Touch => self.touch = None,
            EventCategory::Text => self.text = None,
            EventCategory::Accelerometer => self.accelerometer = None,
        }
    }

    /// Check if a slot has a subscriber
    pub fn is_subscribed(&self, category: EventCategory) -> bool {
        match category {
            EventCategory::Touch => self.touch.is_some(),
            EventCategory::Text => self.text.is_some(),
            EventCategory::Accelerometer => self.accelerometer.is_some(),
        }
    }

    /// Deliver a touch event
    ///
    /// Returns whether a subscriber received it.
    pub fn dispatch_touch(&mut self, event: TouchEvent) -> bool {
        match self.touch.as_mut() {
            Some(handler) => {
                handler.on_touch(event);
                true
            }
            None => false,
        }
    }

    /// Deliver text input
    pub fn dispatch_text(&mut self, input: &TextInput) -> bool {
        match self.text.as_mut() {
            Some(handler) => {
                handler.on_text(input);
                true
            }
            None => false,
        }
    }

    /// Deliver an accelerometer sample
    pub fn dispatch_accelerometer(&mut self, sample: AccelerometerSample) -> bool {
        match self.accelerometer.as_mut() {
            Some(handler) => {
                handler.on_accelerometer(sample);
                true
            }
            None => false,
        }
    }
}
