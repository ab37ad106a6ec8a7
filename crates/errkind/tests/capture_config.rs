//! Process-wide capture settings. Single test, see `throttle.rs`.

use std::time::Duration;

use errkind::{configure, throttle, unthrottle, CaptureConfig, ConfigError, Template};

#[test]
fn disabled_capture_skips_frames_and_budget() {
    let t = Template::new("cfg");

    configure(CaptureConfig::default().depth(2)).unwrap();
    let occ = t.instantiate();
    assert!(!occ.frames().is_empty());
    assert!(occ.frames().len() <= 2);

    throttle(Duration::from_secs(60), 1).unwrap();
    configure(CaptureConfig::disabled()).unwrap();
    assert!(t.instantiate().frames().is_empty());
    assert!(t.instantiate().frames().is_empty());
    // Disabled capture consumed nothing.
    assert_eq!(errkind::throttle::global().remaining(), Some(1));

    configure(CaptureConfig::default()).unwrap();
    assert!(!t.instantiate().frames().is_empty());
    assert!(t.instantiate().frames().is_empty());
    unthrottle();

    let err = configure(CaptureConfig::default().depth(errkind::config::MAX_DEPTH + 1)).unwrap_err();
    assert!(matches!(err, ConfigError::DepthTooLarge { .. }));
    assert_eq!(errkind::config::current(), CaptureConfig::default());
}
