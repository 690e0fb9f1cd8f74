//! Elevator Controller
//!
//! Call buttons are grouped so several stimuli share one transition. A door
//! timer closes the door after three seconds, and a motor driver reports
//! arrival by firing an event. Enter callbacks command the driver.
//!
//! Key concepts:
//! - Event groups fanning several buttons into one edge
//! - A self-loop that keeps the door open
//! - Enter callbacks under the `Independent` policy (with the default
//!   policy an empty exit map would disable them)
//!
//! Run with: RUST_LOG=tinysm=debug cargo run --example elevator

use std::cell::Cell;
use std::rc::Rc;
use tinysm::{
    state_enum, CallbackMap, CallbackPolicy, Event, EventGroup, MachineConfig, StateMachine,
    TransitionTable,
};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Elevator {
        MovingUp,
        MovingDown,
        DoorOpen,
        DoorClosed,
    }
}

struct DoorTimer {
    event: Event<Elevator>,
    seconds: Cell<u32>,
}

impl DoorTimer {
    const THRESHOLD: u32 = 3;

    fn update(&self, increment: u32) {
        self.seconds.set(self.seconds.get() + increment);
        if self.seconds.get() >= Self::THRESHOLD {
            self.reset();
            self.event.trigger();
        }
    }

    fn reset(&self) {
        self.seconds.set(0);
    }
}

/// Door button: restarts the timer, then fires.
struct OpenDoorButton {
    event: Event<Elevator>,
    timer: Rc<DoorTimer>,
}

impl OpenDoorButton {
    fn press(&self) {
        self.timer.reset();
        self.event.trigger();
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Idle,
    Up,
    Down,
}

struct Driver {
    reached_floor: Event<Elevator>,
    destination: Cell<i32>,
    floor: Cell<i32>,
    direction: Cell<Direction>,
}

impl Driver {
    fn update(&self, increment: i32) {
        let arrived = match self.direction.get() {
            Direction::Idle => return,
            Direction::Up => {
                self.floor.set(self.floor.get() + increment);
                self.floor.get() >= self.destination.get()
            }
            Direction::Down => {
                self.floor.set(self.floor.get() - increment);
                self.floor.get() <= self.destination.get()
            }
        };

        if arrived {
            self.floor.set(self.destination.get());
            self.direction.set(Direction::Idle);
            self.reached_floor.trigger();
        }
    }

    fn move_up(&self) {
        self.direction.set(Direction::Up);
    }

    fn move_down(&self) {
        self.direction.set(Direction::Down);
    }

    fn open_door(&self) {
        println!("  driver: door motors open (floor {})", self.floor.get());
    }

    fn close_door(&self) {
        println!("  driver: door motors close");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Elevator Controller ===\n");

    let timer = Rc::new(DoorTimer {
        event: Event::new("close_door_timer"),
        seconds: Cell::new(0),
    });
    let button = |name: &str| OpenDoorButton {
        event: Event::new(name),
        timer: Rc::clone(&timer),
    };
    let press_up_at_floor = button("press_up_at_floor");
    let press_down_at_floor = button("press_down_at_floor");
    let press_open_door = button("press_open_door");

    let press_up_above = Event::new("press_up_above");
    let press_up_below = Event::new("press_up_below");
    let press_down_above = Event::new("press_down_above");
    let press_down_below = Event::new("press_down_below");
    let select_floor_above = Event::new("select_floor_above");
    let select_floor_below = Event::new("select_floor_below");
    let reached_selected_floor = Event::new("reached_selected_floor");

    let open_door = EventGroup::new(
        "open_door",
        [
            &press_up_at_floor.event,
            &press_down_at_floor.event,
            &press_open_door.event,
        ],
    )
    .expect("group has members");
    let go_down = EventGroup::new(
        "go_down",
        [&select_floor_below, &press_up_below, &press_down_below],
    )
    .expect("group has members");
    let go_up = EventGroup::new(
        "go_up",
        [&select_floor_above, &press_up_above, &press_down_above],
    )
    .expect("group has members");

    let driver = Rc::new(Driver {
        reached_floor: reached_selected_floor.clone(),
        destination: Cell::new(0),
        floor: Cell::new(0),
        direction: Cell::new(Direction::Idle),
    });

    let (d1, d2, d3, d4) = (
        Rc::clone(&driver),
        Rc::clone(&driver),
        Rc::clone(&driver),
        Rc::clone(&driver),
    );
    let on_enter = CallbackMap::new()
        .on(Elevator::DoorClosed, move || d1.close_door())
        .on(Elevator::DoorOpen, move || d2.open_door())
        .on(Elevator::MovingUp, move || d3.move_up())
        .on(Elevator::MovingDown, move || d4.move_down());

    let elevator = StateMachine::with_config(
        Elevator::DoorClosed,
        TransitionTable::new()
            .with((Elevator::DoorOpen, Elevator::DoorClosed), &timer.event)
            .with((Elevator::DoorClosed, Elevator::DoorOpen), &open_door)
            .with((Elevator::DoorOpen, Elevator::DoorOpen), &open_door)
            .with((Elevator::DoorClosed, Elevator::MovingUp), &go_up)
            .with((Elevator::MovingUp, Elevator::DoorOpen), &reached_selected_floor)
            .with((Elevator::DoorClosed, Elevator::MovingDown), &go_down)
            .with((Elevator::MovingDown, Elevator::DoorOpen), &reached_selected_floor),
        on_enter,
        CallbackMap::new(),
        MachineConfig::default().with_callback_policy(CallbackPolicy::Independent),
    );

    let show = |label: &str| println!("{label:<32} elevator: {}", elevator.current_state().name());

    show("start");

    press_up_at_floor.press();
    show("press up at floor");

    timer.update(1);
    show("1s later");

    timer.update(1);
    timer.update(1);
    show("3s later");

    press_down_at_floor.press();
    show("press down at floor");

    timer.update(3);
    show("3s later");

    driver.destination.set(10);
    select_floor_above.trigger();
    show("select floor 10");

    driver.update(10);
    show("driver moved 10 floors");

    timer.update(3);
    show("3s later");

    driver.destination.set(2);
    press_down_below.trigger();
    show("call from floor 2");

    driver.update(8);
    show("driver moved 8 floors");

    println!("\nTransitions taken: {}", elevator.history().len());
    println!("\n=== Example Complete ===");
}
