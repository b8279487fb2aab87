//! Traversal statistics for debugging and performance analysis.
//!
//! Enable with the `traversal-stats` feature:
//! ```bash
//! cargo run --example starfield --features traversal-stats
//! ```
//!
//! Counters are reported through `log` at most once per second:
//! - frames completed
//! - nodes ticked and nodes culled by the tick pass
//! - nodes drawn and nodes culled by the render pass

/// Snapshot of accumulated traversal statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub frames: u64,
    pub nodes_ticked: u64,
    pub tick_culled: u64,
    pub nodes_drawn: u64,
    pub render_culled: u64,
}

#[cfg(feature = "traversal-stats")]
mod inner {
    use std::cell::RefCell;
    use std::time::Instant;

    thread_local! {
        static STATS: RefCell<TraversalStats> = RefCell::new(TraversalStats::new());
    }

    struct TraversalStats {
        frames: u64,
        nodes_ticked: u64,
        tick_culled: u64,
        nodes_drawn: u64,
        render_culled: u64,
        last_print: Instant,
    }

    impl TraversalStats {
        fn new() -> Self {
            Self {
                frames: 0,
                nodes_ticked: 0,
                tick_culled: 0,
                nodes_drawn: 0,
                render_culled: 0,
                last_print: Instant::now(),
            }
        }

        fn reset(&mut self) {
            *self = Self::new();
        }
    }

    #[inline]
    pub fn record_ticked() {
        STATS.with(|s| s.borrow_mut().nodes_ticked += 1);
    }

    /// Record a subtree skipped by the tick pass.
    #[inline]
    pub fn record_tick_culled() {
        STATS.with(|s| s.borrow_mut().tick_culled += 1);
    }

    #[inline]
    pub fn record_drawn() {
        STATS.with(|s| s.borrow_mut().nodes_drawn += 1);
    }

    /// Record a subtree skipped by the render pass.
    #[inline]
    pub fn record_render_culled() {
        STATS.with(|s| s.borrow_mut().render_culled += 1);
    }

    /// Return a snapshot of the current stats (for testing).
    pub fn get_stats() -> super::StatsSnapshot {
        STATS.with(|s| {
            let stats = s.borrow();
            super::StatsSnapshot {
                frames: stats.frames,
                nodes_ticked: stats.nodes_ticked,
                tick_culled: stats.tick_culled,
                nodes_drawn: stats.nodes_drawn,
                render_culled: stats.render_culled,
            }
        })
    }

    /// Reset all stats to zero (for test isolation).
    pub fn reset_stats() {
        STATS.with(|s| s.borrow_mut().reset());
    }

    /// Called once per frame, after render. Reports and resets every second.
    pub fn end_frame() {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.frames += 1;

            if stats.last_print.elapsed().as_secs() >= 1 {
                let tick_total = stats.nodes_ticked + stats.tick_culled;
                let cull_rate = if tick_total > 0 {
                    (stats.tick_culled as f64 / tick_total as f64) * 100.0
                } else {
                    0.0
                };

                log::info!(
                    "[Traversal Stats] frames={} ticked={} tick_culled={} drawn={} render_culled={} cull_rate={:.1}%",
                    stats.frames,
                    stats.nodes_ticked,
                    stats.tick_culled,
                    stats.nodes_drawn,
                    stats.render_culled,
                    cull_rate
                );

                stats.reset();
            }
        });
    }
}

#[cfg(feature = "traversal-stats")]
pub use inner::*;

// No-op implementations when the feature is disabled

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn get_stats() -> StatsSnapshot {
    StatsSnapshot::default()
}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn reset_stats() {}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn record_ticked() {}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn record_tick_culled() {}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn record_drawn() {}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn record_render_culled() {}

#[cfg(not(feature = "traversal-stats"))]
#[inline(always)]
pub fn end_frame() {}

#[cfg(test)]
#[cfg(feature = "traversal-stats")]
mod tests {
    use super::*;

    /// Tests share the thread-local when run on the same thread.
    fn setup() {
        reset_stats();
    }

    #[test]
    fn test_counters() {
        setup();
        record_ticked();
        record_ticked();
        record_tick_culled();
        record_drawn();
        record_render_culled();
        end_frame();

        let s = get_stats();
        assert_eq!(s.nodes_ticked, 2);
        assert_eq!(s.tick_culled, 1);
        assert_eq!(s.nodes_drawn, 1);
        assert_eq!(s.render_culled, 1);
        assert_eq!(s.frames, 1);
    }

    #[test]
    fn test_reset() {
        setup();
        record_drawn();
        reset_stats();
        assert_eq!(get_stats(), StatsSnapshot::default());
    }
}
