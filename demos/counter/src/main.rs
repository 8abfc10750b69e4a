//! A counter as a dynamic hook.
//!
//! Each simulated user action bumps the render generation, so the hook
//! recomputes once per action and its getter observes the write committed by
//! the previous one.

use std::rc::Rc;

use rehook_core::prelude::*;

struct Counter {
    count: i32,
    increment: Rc<dyn Fn()>,
    decrement: Rc<dyn Fn()>,
}

fn use_counter(generation: u32, step: i32) -> Rc<Counter> {
    use_dynamic((generation, step), move |state: &StateHandle<i32>| {
        let count = state.get().unwrap_or(0);
        let up = {
            let state = state.clone();
            move || state.update(|v| v.copied().unwrap_or(0) + step)
        };
        let down = {
            let state = state.clone();
            move || state.update(|v| v.copied().unwrap_or(0) - step)
        };
        Counter {
            count,
            increment: Rc::new(up),
            decrement: Rc::new(down),
        }
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new();
    let mut generation = 0u32;

    let actions: [&str; 5] = ["inc", "inc", "inc", "dec", "inc"];
    for action in actions {
        generation += 1;
        let counter = host.render(|| use_counter(generation, 1));
        println!("render {generation}: count = {}", counter.count);

        match action {
            "inc" => (counter.increment)(),
            _ => (counter.decrement)(),
        }
        log::debug!("{action} scheduled a re-render: {}", host.needs_render());
    }

    generation += 1;
    let counter = host.render(|| use_counter(generation, 1));
    println!("final: count = {}", counter.count);

    host.unmount();
    Ok(())
}
