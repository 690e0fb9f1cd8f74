//! Two-Digit Clock
//!
//! Two ten-state machines, one per digit. The units tick reads its own
//! machine's state through the event and carries into the dozens digit
//! before rolling over.
//!
//! Run with: cargo run --example clock

use tinysm::{Event, StateMachine, TransitionTable};

type Digit = u8;

struct TickSecond {
    event: Event<Digit>,
    carry: Event<Digit>,
}

impl TickSecond {
    fn tick(&self) {
        if self.event.state() == 9 {
            self.carry.trigger();
        }
        self.event.trigger();
    }
}

fn digit_table(tick: &Event<Digit>) -> TransitionTable<Digit> {
    (0..10).fold(TransitionTable::new(), |table, digit| {
        table.with((digit, (digit + 1) % 10), tick)
    })
}

fn main() {
    println!("=== Two-Digit Clock ===\n");

    let tick_dozen = Event::new("tick_dozen");
    let tick_second = TickSecond {
        event: Event::new("tick_second"),
        carry: tick_dozen.clone(),
    };

    let units = StateMachine::new(0, digit_table(&tick_second.event));
    let dozens = StateMachine::new(0, digit_table(&tick_dozen));

    for _ in 0..13 {
        println!("{}{}", dozens.current_state(), units.current_state());
        tick_second.tick();
    }

    println!("\n=== Example Complete ===");
}
