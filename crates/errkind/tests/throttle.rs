//! Process-wide throttle. Kept to a single test: the throttle is global and
//! tests in one binary run concurrently.

use std::thread;
use std::time::Duration;

use errkind::{throttle, unthrottle, Template};

fn captured(t: &Template, n: usize) -> usize {
    (0..n).filter(|_| !t.instantiate().frames().is_empty()).count()
}

#[test]
fn global_budget_per_period() {
    let t = Template::new("msg");
    assert_eq!(captured(&t, 20), 20);

    throttle(Duration::from_millis(250), 5).unwrap();
    assert!(errkind::throttle::global().is_active());
    assert_eq!(captured(&t, 20), 5);

    // First reset at 250ms, second not before 500ms.
    thread::sleep(Duration::from_millis(375));
    assert_eq!(captured(&t, 20), 5);

    // Reactivation replaces the budget and restarts the period.
    throttle(Duration::from_secs(60), 2).unwrap();
    assert_eq!(captured(&t, 10), 2);

    unthrottle();
    assert!(!errkind::throttle::global().is_active());
    assert_eq!(captured(&t, 20), 20);

    unthrottle();
    assert_eq!(captured(&t, 5), 5);
}
