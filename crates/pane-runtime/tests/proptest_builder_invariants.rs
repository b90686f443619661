#![forbid(unsafe_code)]

//! Property-based invariant tests for interface builders and pipelines.
//!
//! ## Invariants
//!
//! 1. Wither immutability: deriving a builder never changes the original.
//! 2. Priority stability: stages run in ascending priority, ties in
//!    insertion order.
//! 3. Build snapshot: a built definition is unaffected by later withers.
//! 4. Row validation: `build` succeeds exactly for rows inside the surface.

use std::cell::RefCell;
use std::rc::Rc;

use pane_core::testing::RecordingViewer;
use pane_core::{ConfigurationError, GridPane, SurfaceConfig};
use pane_runtime::Builder;
use proptest::prelude::*;

type Recorder = RecordingViewer<GridPane>;
type MenuBuilder = Builder<GridPane, Recorder>;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_priorities(max_n: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-5i32..=5, 0..max_n)
}

fn with_logged_stages(priorities: &[i32], log: &Rc<RefCell<Vec<(i32, usize)>>>) -> MenuBuilder {
    priorities
        .iter()
        .enumerate()
        .fold(MenuBuilder::default(), |builder, (seq, &priority)| {
            let log = Rc::clone(log);
            builder.add_tracked_transform(
                pane_core::PropertyKey::untracked(),
                priority,
                move |pane, _, _| {
                    log.borrow_mut().push((priority, seq));
                    Ok(pane)
                },
            )
        })
}

// ── 1. Wither immutability ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn withers_never_touch_the_original(
        priorities in arb_priorities(8),
        rows in 1u16..=6,
        title in "[A-Za-z ]{0,16}",
        delay in 1u32..100,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let base = with_logged_stages(&priorities, &log);
        let before = (base.rows(), base.title().to_owned(), base.transformations().priorities());

        let _derived = base
            .with_rows(rows)
            .with_title(title)
            .with_updates(true, delay)
            .add_transform(|pane, _, _| Ok(pane))
            .add_close_handler(|_, _| Ok(()));

        prop_assert_eq!(
            (base.rows(), base.title().to_owned(), base.transformations().priorities()),
            before
        );
        prop_assert!(!base.updates());
        prop_assert!(base.close_handlers().is_empty());
    }
}

// ── 2. Priority stability ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn stages_run_in_stable_priority_order(priorities in arb_priorities(12)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = with_logged_stages(&priorities, &log).build().unwrap();
        let _view = menu.open(Recorder::new(1));

        let mut expected: Vec<(i32, usize)> =
            priorities.iter().copied().zip(0..).collect();
        expected.sort_by_key(|&(priority, _)| priority);

        prop_assert_eq!(log.borrow().clone(), expected);
        let sorted = menu.transformations().priorities();
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}

// ── 3. Build snapshot ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn built_definition_is_a_snapshot(priorities in arb_priorities(6), extra in 1usize..5) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let builder = with_logged_stages(&priorities, &log);
        let built = builder.build().unwrap();

        let mut later = builder.clone();
        for _ in 0..extra {
            later = later.add_transform(|pane, _, _| Ok(pane));
        }

        prop_assert_eq!(built.transformations().len(), priorities.len());
        prop_assert_eq!(later.transformations().len(), priorities.len() + extra);
    }
}

// ── 4. Row validation ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rows_validated_against_surface(min in 1u16..4, span in 0u16..6, rows in 0u16..12) {
        let surface = SurfaceConfig { columns: 9, min_rows: min, max_rows: min + span };
        let result = MenuBuilder::default().with_surface(surface).with_rows(rows).build();
        if (min..=min + span).contains(&rows) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                ConfigurationError::RowsOutOfRange { rows, min, max: min + span }
            );
        }
    }
}
