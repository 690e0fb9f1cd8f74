//! LED Toggle
//!
//! Two switches drive a two-state machine. Pressing a switch whose edge
//! does not leave the current state does nothing.
//!
//! Key concepts:
//! - Host types wrapping an `Event`
//! - Removing and re-adding a transition at runtime
//!
//! Run with: cargo run --example led

use tinysm::{Event, StateMachine, TransitionTable};

struct Switch {
    event: Event<bool>,
}

impl Switch {
    fn new(name: &str) -> Self {
        Self {
            event: Event::new(name),
        }
    }

    fn press(&self) {
        self.event.trigger();
    }
}

fn main() {
    println!("=== LED Toggle ===\n");

    let turn_on = Switch::new("turn_on");
    let turn_off = Switch::new("turn_off");

    let led = StateMachine::new(
        false,
        TransitionTable::new()
            .with((false, true), &turn_on.event)
            .with((true, false), &turn_off.event),
    );

    println!("default state: {}", led.current_state());

    turn_on.press();
    println!("state after [press on switch]: {}", led.current_state());

    turn_on.press();
    println!("state after [press on switch]: {}", led.current_state());

    turn_off.press();
    println!("state after [press off switch]: {}", led.current_state());

    led.remove_transition((false, true));
    println!("removed turn on switch transition");
    turn_on.press();
    println!("state after [press on switch]: {}", led.current_state());

    led.add_transition((false, true), &turn_on.event);
    println!("added turn on switch transition");
    turn_on.press();
    println!("state after [press on switch]: {}", led.current_state());

    println!("\n=== Example Complete ===");
}
