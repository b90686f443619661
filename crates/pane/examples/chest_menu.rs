//! A five-row chest menu rendered to the terminal.
//!
//! Demonstrates priorities, element click actions, a tracked property,
//! open-time arguments, timed updates and close handlers, with a console
//! viewer standing in for a real host.
//!
//! Run:
//!   RUST_LOG=pane=debug cargo run -p pane --example chest_menu

use std::cell::Cell;
use std::rc::Rc;

use pane::prelude::*;
use pane::{ClickContext, ClickKind, PropertyKey, ViewStatus};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ROWS: u16 = 5;
const COLUMNS: u16 = 9;

const CONCRETE: ArgumentKey<&'static str> = ArgumentKey::new("concrete");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    One,
    Two,
    Three,
}

impl Selection {
    const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    fn row(self) -> u16 {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
        }
    }

    fn material(self) -> &'static str {
        match self {
            Self::One => "emerald",
            Self::Two => "diamond",
            Self::Three => "iron",
        }
    }

    fn art(self) -> &'static [(u16, u16)] {
        match self {
            Self::One => &[(5, 1), (5, 2), (5, 3), (4, 1)],
            Self::Two => &[(4, 1), (5, 1), (6, 2), (5, 3), (4, 3), (6, 3)],
            Self::Three => &[(4, 1), (5, 1), (6, 2), (5, 2), (4, 3), (5, 3)],
        }
    }
}

/// Prints every presented pane as a character grid.
#[derive(Clone)]
struct ConsoleViewer {
    id: ViewerId,
    name: &'static str,
}

impl Viewer<GridPane> for ConsoleViewer {
    fn id(&self) -> ViewerId {
        self.id
    }

    fn present(&self, title: &str, pane: &GridPane) {
        println!("── {title} ({}) ──", self.name);
        for y in 0..pane.rows() {
            let row: String = (0..pane.columns())
                .map(|x| {
                    pane.get(Slot::new(x, y))
                        .and_then(|e| e.label().chars().next())
                        .unwrap_or('.')
                })
                .collect();
            println!("   {row}");
        }
    }

    fn dismiss(&self) {
        println!("── closed for {} ──", self.name);
    }
}

fn build_menu(
    selected: &Property<Selection>,
    ticks: Rc<TickLoop>,
    frame: Rc<Cell<u64>>,
) -> Result<Interface<GridPane, ConsoleViewer>> {
    let menu = Interface::<GridPane, ConsoleViewer>::builder()
        .with_title("Example Chest")
        .with_rows(ROWS)
        .with_updates(true, 20)
        .with_scheduler(ticks)
        .with_click_handler(ClickHandler::canceling(
            |ctx: &ClickContext<'_, GridPane, ConsoleViewer>| {
                tracing::info!(viewer = %ctx.viewer().id(), slot = %ctx.slot(), "clicked");
                Ok(())
            },
        ))
        // Black backing, drawn before everything else.
        .add_tracked_transform(PropertyKey::untracked(), 5, |mut pane, _, _| {
            let backing = Element::new("black_concrete");
            for x in 3..COLUMNS - 1 {
                for y in 0..ROWS {
                    pane.set(Slot::new(x, y), backing.clone());
                }
            }
            Ok(pane)
        })
        .add_transform({
            let selected = selected.clone();
            move |mut pane, _, _| {
                for option in Selection::ALL {
                    let selected = selected.clone();
                    pane.set(
                        Slot::new(1, option.row()),
                        Element::new(option.material()).with_action(move |event| {
                            if event.kind == ClickKind::Left {
                                selected.set(option);
                            }
                            Ok(())
                        }),
                    );
                }
                Ok(pane)
            }
        })
        .add_tracked_transform(selected, 10, {
            let selected = selected.clone();
            move |mut pane, _, args| {
                let concrete = args.get(&CONCRETE).copied().unwrap_or("white_concrete");
                let art = Element::new(concrete);
                for &(x, y) in selected.get().art() {
                    pane.set(Slot::new(x, y), art.clone());
                }
                Ok(pane)
            }
        })
        .add_transform(move |mut pane, _, _| {
            frame.set(frame.get() + 1);
            let clock = if frame.get() % 2 == 0 { "tick" } else { "tock" };
            pane.set(Slot::new(0, ROWS - 1), Element::new(clock));
            Ok(pane)
        })
        .add_close_handler(|_, viewer: &ConsoleViewer| {
            println!("bye, {}", viewer.name);
            Ok(())
        })
        .build()?;
    Ok(menu)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let ticks = Rc::new(TickLoop::new());
    let selected = Property::new(Selection::One);
    let menu = build_menu(&selected, Rc::clone(&ticks), Rc::new(Cell::new(0)))?;

    let alex = ConsoleViewer {
        id: ViewerId::new(1),
        name: "alex",
    };
    let arguments = Arguments::builder().with(CONCRETE, "lime_concrete").build();
    let view = menu.open_with_title(alex, arguments, "Your Chest: alex");

    // Clicking an option element updates the tracked property, which
    // re-renders the art.
    view.click(ClickEvent::left(Slot::new(1, 1)));
    assert_eq!(selected.get(), Selection::Two);

    // One timed update.
    ticks.advance(20);

    view.close();
    assert_eq!(view.status(), ViewStatus::Closed);
    ticks.advance(40);
    Ok(())
}
