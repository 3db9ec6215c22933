mod utils;

use stream_relay::video::{Framerate, SessionContext};
use utils::ScriptedSource;

#[test]
fn clock_starts_at_zero_and_steps_at_the_target_rate() {
    // 25fps divides a second evenly, so the stamps are a plain
    // arithmetic sequence
    let mut ctx = SessionContext::new(ScriptedSource::ready(10), Framerate::new(25, 1));

    for n in 0..10u64 {
        let (frame, timing) = ctx.pull_next().expect("frame should be ready");
        assert_eq!(frame, n as u32);
        assert_eq!(timing.pts.nseconds(), n * 40_000_000);
        assert_eq!(timing.duration.nseconds(), 40_000_000);
    }

    assert!(ctx.pull_next().is_none());
}

#[test]
fn uneven_rates_stay_drift_free() {
    // 29fps does not divide a second; the clock follows the exact
    // positions instead of accumulating a truncated step
    let mut ctx = SessionContext::new(ScriptedSource::ready(3), Framerate::default());

    let stamps: Vec<u64> = std::iter::from_fn(|| ctx.pull_next())
        .map(|(_, timing)| timing.pts.nseconds())
        .collect();

    assert_eq!(stamps, vec![0, 34_482_758, 68_965_517]);
}

#[test]
fn clock_is_gap_free_and_strictly_increasing() {
    let mut ctx = SessionContext::new(ScriptedSource::ready(100), Framerate::default());

    let mut next_slot = 0;
    while let Some((_, timing)) = ctx.pull_next() {
        assert_eq!(timing.pts.nseconds(), next_slot);
        assert!(timing.duration.nseconds() > 0);
        next_slot = timing.pts.nseconds() + timing.duration.nseconds();
    }

    assert_eq!(ctx.frames_out(), 100);
}

#[test]
fn dry_pull_leaves_the_clock_untouched() {
    let mut ctx = SessionContext::new(
        ScriptedSource::new([Some(0), None, None, Some(1)]),
        Framerate::new(25, 1),
    );

    assert_eq!(ctx.pull_next().unwrap().1.pts.nseconds(), 0);

    // two demand cycles with nothing ready: no stamp, no advance
    assert!(ctx.pull_next().is_none());
    assert!(ctx.pull_next().is_none());
    assert_eq!(ctx.frames_out(), 1);

    // the next frame takes the very next slot, leaving no gap
    assert_eq!(ctx.pull_next().unwrap().1.pts.nseconds(), 40_000_000);
}

#[test]
fn a_fresh_session_context_restarts_the_clock() {
    let rate = Framerate::new(25, 1);

    let mut first = SessionContext::new(ScriptedSource::ready(2), rate);
    first.pull_next();
    first.pull_next();
    assert_eq!(first.frames_out(), 2);

    let mut second = SessionContext::new(ScriptedSource::ready(1), rate);
    assert_eq!(second.pull_next().unwrap().1.pts.nseconds(), 0);
}
