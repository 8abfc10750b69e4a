//! A lap timer hook: the start instant lives in the hook's state cell, set
//! during the first invocation, and each lap recomputes the elapsed time.
//! Also shows `key_effect` cleanup tied to the lap key and the unmount path.

use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use rehook_core::prelude::*;
use web_time::Instant;

struct Lap {
    lap: u32,
    elapsed: Duration,
}

fn use_stopwatch(lap: u32) -> Rc<Lap> {
    use_dynamic([lap], move |state: &StateHandle<Instant>| {
        let started = state.get().unwrap_or_else(|| {
            let now = Instant::now();
            state.set(now);
            now
        });
        Lap {
            lap,
            elapsed: started.elapsed(),
        }
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new();

    for lap in 0..4 {
        let reading = host.render(|| {
            key_effect(lap, move || {
                log::info!("lap {lap} started");
                on_unmount(move || log::info!("lap {lap} finished"))
            });
            use_stopwatch(lap)
        });
        println!("lap {}: {:?} elapsed", reading.lap, reading.elapsed);
        sleep(Duration::from_millis(50));
    }

    host.unmount();
    Ok(())
}
