//! Main control loop: gesture → sequence number → frame → delivery.
//!
//! The first gesture is the press that woke the remote; the binary reads
//! it before the radio is up.  Every later gesture restarts delivery with
//! a fresh frame.

use core::convert::Infallible;

use crate::input::{ButtonSampler, Classifier, Clock};
use crate::message::{encode, Frame};
use crate::sequence::{CounterStore, SequenceCounter};

pub struct Remote<S> {
    classifier: Classifier,
    counter: SequenceCounter<S>,
}

impl<S: CounterStore> Remote<S> {
    pub const fn new(store: S) -> Self {
        Self {
            classifier: Classifier::new(),
            counter: SequenceCounter::new(store),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn counter(&self) -> &SequenceCounter<S> {
        &self.counter
    }

    /// Wait for the next gesture and encode it under a new sequence number.
    pub async fn next_frame<B, C, D>(&mut self, sampler: &mut B, clock: &C, delay: &mut D) -> Frame
    where
        B: ButtonSampler,
        C: Clock,
        D: embedded_hal_async::delay::DelayNs,
    {
        let code = self
            .classifier
            .read_button_press_async(sampler, clock, delay)
            .await;
        let sequence = self.counter.next_sequence().await;
        info!("Remote: event {} seq {}", code.get(), sequence);
        encode(code, sequence)
    }

    /// Hand every gesture's frame to `deliver`, forever.
    pub async fn run<B, C, D, K>(&mut self, sampler: &mut B, clock: &C, delay: &mut D, mut deliver: K) -> Infallible
    where
        B: ButtonSampler,
        C: Clock,
        D: embedded_hal_async::delay::DelayNs,
        K: FnMut(Frame),
    {
        loop {
            let frame = self.next_frame(sampler, clock, delay).await;
            deliver(frame);
        }
    }
}
