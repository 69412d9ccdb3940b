/// Logs a line every `step` processed rows while reading a large table.
pub struct Progress {
    label: &'static str,
    counter: usize,
    step: usize,
}

impl Progress {
    pub fn new(label: &'static str, step: usize) -> Self {
        Self {
            label,
            counter: 0,
            step: step.max(1),
        }
    }

    pub fn inc(&mut self) {
        self.counter += 1;
        if self.counter % self.step == 0 {
            log::info!("{} progress: {}", self.label, self.counter);
        }
    }

    pub fn count(&self) -> usize {
        self.counter
    }
}
