//! Tick schedule
//!
//! Ticks are discrete pulses played while a wheel spins. They start fast
//! and slow down, loosely following the easing curve. The schedule is an
//! approximation for feedback only and never affects the outcome.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Tunables for tick generation
#[derive(Debug, Clone, PartialEq)]
pub struct TickTuning {
    /// Delay before the first tick
    pub lead_in: Duration,
    /// How many ticks a spin produces
    pub count: RangeInclusive<u32>,
    /// Gap between the first two ticks
    pub min_gap: Duration,
    /// Gap between the last two ticks, before scaling to the spin length
    pub max_gap: Duration,
}

impl Default for TickTuning {
    fn default() -> Self {
        Self {
            lead_in: Duration::from_millis(50),
            count: 20..=30,
            min_gap: Duration::from_millis(30),
            max_gap: Duration::from_millis(400),
        }
    }
}

/// Tick offsets from spin start, strictly increasing and strictly before
/// the spin duration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickSchedule {
    offsets: Vec<Duration>,
}

/// Time kept free before the spin ends so the last tick precedes landing
const TAIL_MARGIN: Duration = Duration::from_millis(100);

impl TickSchedule {
    /// Build a randomized schedule for a spin lasting `duration`
    pub fn generate<R: Rng + ?Sized>(duration: Duration, tuning: &TickTuning, rng: &mut R) -> Self {
        let lead_in = tuning.lead_in;
        if lead_in >= duration {
            return Self::default();
        }

        let min_count = (*tuning.count.start()).max(1);
        let max_count = (*tuning.count.end()).max(min_count);
        let count = rng.gen_range(min_count..=max_count) as usize;

        let min_gap = tuning.min_gap.as_secs_f64();
        let max_gap = tuning.max_gap.as_secs_f64().max(min_gap);

        // Quadratic slowdown: gap grows with the square of progress
        let gaps: Vec<f64> = (1..count)
            .map(|i| {
                let progress = i as f64 / count as f64;
                min_gap + (max_gap - min_gap) * progress * progress
            })
            .collect();

        // Squeeze everything into the window left after the lead-in
        let window = duration
            .saturating_sub(lead_in)
            .saturating_sub(TAIL_MARGIN)
            .as_secs_f64();
        let total: f64 = gaps.iter().sum();
        let scale = if total > window && total > 0.0 { window / total } else { 1.0 };

        let mut offsets = Vec::with_capacity(count);
        let mut at = lead_in.as_secs_f64();
        offsets.push(lead_in);
        for gap in gaps {
            at += gap * scale;
            offsets.push(Duration::from_secs_f64(at));
        }
        offsets.retain(|offset| *offset < duration);

        Self { offsets }
    }

    pub fn offsets(&self) -> &[Duration] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SPIN: Duration = Duration::from_millis(4000);

    #[test]
    fn test_count_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let schedule = TickSchedule::generate(SPIN, &TickTuning::default(), &mut rng);
            assert!((20..=30).contains(&schedule.len()));
        }
    }

    #[test]
    fn test_starts_after_lead_in_and_ends_before_landing() {
        let mut rng = StdRng::seed_from_u64(12);
        let schedule = TickSchedule::generate(SPIN, &TickTuning::default(), &mut rng);
        assert_eq!(schedule.offsets()[0], Duration::from_millis(50));
        assert!(*schedule.offsets().last().unwrap() < SPIN);
    }

    #[test]
    fn test_gaps_grow() {
        let mut rng = StdRng::seed_from_u64(13);
        let schedule = TickSchedule::generate(SPIN, &TickTuning::default(), &mut rng);
        let gaps: Vec<Duration> = schedule
            .offsets()
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect();
        assert!(gaps.iter().all(|g| !g.is_zero()));
        for pair in gaps.windows(2) {
            assert!(pair[1] >= pair[0], "gaps shrank: {:?}", pair);
        }
    }

    #[test]
    fn test_short_spin_is_compressed() {
        let mut rng = StdRng::seed_from_u64(14);
        let short = Duration::from_millis(600);
        let schedule = TickSchedule::generate(short, &TickTuning::default(), &mut rng);
        assert!(!schedule.is_empty());
        assert!(schedule.offsets().iter().all(|o| *o < short));
    }

    #[test]
    fn test_lead_in_longer_than_spin() {
        let mut rng = StdRng::seed_from_u64(15);
        let schedule = TickSchedule::generate(Duration::from_millis(10), &TickTuning::default(), &mut rng);
        assert!(schedule.is_empty());
    }
}
