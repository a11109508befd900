use std::collections::VecDeque;

use crate::classify::IdealBand;
use crate::models::EnvironmentalSample;

/// Sliding window of cold-storage readings plus the current excursion flags.
///
/// Holds the most recent N samples for trend display, oldest evicted first.
/// The excursion flags always reflect the latest sample only.
#[derive(Debug)]
pub struct EnvironmentMonitor {
    window: VecDeque<EnvironmentalSample>,
    capacity: usize,
    temperature_band: IdealBand,
    humidity_band: IdealBand,
    temperature_excursion: bool,
    humidity_excursion: bool,
}

impl EnvironmentMonitor {
    pub fn new(capacity: usize, temperature_band: IdealBand, humidity_band: IdealBand) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            temperature_band,
            humidity_band,
            temperature_excursion: false,
            humidity_excursion: false,
        }
    }

    /// Appends a sample, evicts over capacity, then reclassifies both flags
    /// against the ideal bands.
    pub fn push(&mut self, sample: EnvironmentalSample) {
        self.window.push_back(sample);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
        self.temperature_excursion = self.temperature_band.is_excursion(sample.temperature);
        self.humidity_excursion = self.humidity_band.is_excursion(sample.humidity);
    }

    pub fn latest(&self) -> Option<&EnvironmentalSample> {
        self.window.back()
    }

    pub fn temperature_excursion(&self) -> bool {
        self.temperature_excursion
    }

    pub fn humidity_excursion(&self) -> bool {
        self.humidity_excursion
    }

    /// True if either signal is outside its ideal band.
    pub fn is_excursion(&self) -> bool {
        self.temperature_excursion || self.humidity_excursion
    }

    /// Retained samples, oldest to newest.
    pub fn window(&self) -> impl Iterator<Item = &EnvironmentalSample> {
        self.window.iter()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
