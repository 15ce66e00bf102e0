//! Property-based tests for the scheduler
//!
//! Uses proptest to verify properties that should hold for all task mixes.

use proptest::prelude::*;
use sentinel::models::Priority;

use crate::common::{Behavior, FakeTask, null_sink, scheduler};

const BEHAVIORS: [Behavior; 4] =
    [Behavior::Succeed, Behavior::Fail, Behavior::Fault, Behavior::Panic];

fn priorities() -> impl Strategy<Value = Vec<Priority>> {
    prop::collection::vec(prop::sample::select(Priority::ALL.to_vec()), 1..40)
}

fn behaviors() -> impl Strategy<Value = Vec<Behavior>> {
    prop::collection::vec(prop::sample::select(BEHAVIORS.to_vec()), 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A sweep hands tasks over by non-increasing weight, FIFO among equals
    #[test]
    fn dispatch_weight_never_increases(plan in priorities()) {
        let scheduler = scheduler(2);
        for (index, priority) in plan.iter().enumerate() {
            let task = FakeTask::new(*priority, &format!("{index:03}"));
            scheduler.submit(task.boxed()).unwrap();
        }

        let handles = scheduler.dispatch_all(null_sink()).unwrap();
        scheduler.shutdown();

        prop_assert_eq!(handles.len(), plan.len());
        for pair in handles.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            prop_assert!(first.priority().weight() >= second.priority().weight());
            if first.priority() == second.priority() {
                prop_assert!(first.identifier() < second.identifier());
            }
        }
    }

    /// Every submitted task is counted exactly once, whatever its outcome
    #[test]
    fn report_accounts_for_every_task(mix in behaviors()) {
        let scheduler = scheduler(4);
        for (index, behavior) in mix.iter().enumerate() {
            let task = FakeTask::new(Priority::Info, &format!("t{index}")).behaving(*behavior);
            scheduler.submit(task.boxed()).unwrap();
        }

        scheduler.dispatch_all(null_sink()).unwrap();
        let board = scheduler.report();
        scheduler.shutdown();

        let expected_success = mix.iter().filter(|b| matches!(b, Behavior::Succeed)).count();
        prop_assert_eq!(board.success + board.failed, mix.len());
        prop_assert_eq!(board.success, expected_success);
        prop_assert_eq!(board.total(), mix.len());
    }
}
