use super::{NormalRange, Sample, Status};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Static definition of a monitored parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub normal_range: NormalRange,
}

impl ChannelSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        normal_range: NormalRange,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            normal_range,
        }
    }
}

/// A monitored channel with a rolling window of samples
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    spec: ChannelSpec,
    window_size: usize,
    samples: VecDeque<Sample>,
    status: Status,
}

impl Channel {
    pub fn new(spec: ChannelSpec, window_size: usize) -> Self {
        Self {
            spec,
            window_size,
            samples: VecDeque::with_capacity(window_size),
            status: Status::Normal,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ChannelSpec {
        &self.spec
    }

    pub fn normal_range(&self) -> NormalRange {
        self.spec.normal_range
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn current_value(&self) -> Option<f64> {
        self.latest().map(Sample::value)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Append the newest sample, dropping the oldest once the window is full
    pub fn push(&mut self, sample: Sample) {
        if self.window_size == 0 {
            return;
        }
        while self.samples.len() >= self.window_size {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Bulk replacement, keeping only the newest `window_size` samples
    pub fn replace(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.samples.clear();
        for sample in samples {
            self.push(sample);
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.status = Status::Normal;
    }
}
