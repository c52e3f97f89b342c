//! Fixed-step frame clock.
//!
//! Every gameplay constant (move step, zombie speed, spawn cadence, bullet
//! lifetime) is expressed per simulation frame. The clock turns wall-clock time
//! into a whole number of 1/60 s steps so those constants mean the same thing on
//! a 60 Hz and a 144 Hz display.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: now,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        self.begin_frame_at(Instant::now());
    }

    pub fn begin_frame_at(&mut self, now: Instant) {
        self.real_dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // A stall (window drag, breakpoint) must not replay seconds of game time.
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Drop banked time. Called when play resumes after a blocking dialog so the
    /// world does not lurch forward by the time the dialog was open.
    pub fn discard_backlog(&mut self) {
        self.accumulator = 0.0;
        self.last_instant = Instant::now();
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run_steps(time: &mut TimeState) -> u32 {
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn one_display_frame_at_60hz_runs_one_step() {
        let start = Instant::now();
        let mut time = TimeState::starting_at(start);
        time.begin_frame_at(start + Duration::from_micros(16_700));
        assert_eq!(run_steps(&mut time), 1);
        assert_eq!(time.steps_this_frame, 1);
    }

    #[test]
    fn short_frames_bank_time_until_a_step_is_due() {
        let start = Instant::now();
        let mut time = TimeState::starting_at(start);
        time.begin_frame_at(start + Duration::from_millis(7));
        assert_eq!(run_steps(&mut time), 0);
        time.begin_frame_at(start + Duration::from_millis(17));
        assert_eq!(run_steps(&mut time), 1);
        assert_eq!(time.fixed_step_count, 1);
    }

    #[test]
    fn long_stall_is_capped() {
        let start = Instant::now();
        let mut time = TimeState::starting_at(start);
        time.begin_frame_at(start + Duration::from_secs(5));
        assert!((time.real_dt - time.max_accumulator).abs() < 1e-9);
        // 0.25 s at 60 Hz is about 15 steps, not 300.
        let steps = run_steps(&mut time);
        assert!((14..=15).contains(&steps), "got {steps} steps");
    }

    #[test]
    fn discard_backlog_drops_banked_steps() {
        let start = Instant::now();
        let mut time = TimeState::starting_at(start);
        time.begin_frame_at(start + Duration::from_millis(100));
        time.discard_backlog();
        assert!(!time.should_step());
    }
}
