#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use crate::hook::{MemoCell, StateHandle, use_dynamic, use_dynamic_keyed, use_dynamic_once};
    use crate::runtime::{Host, remember, remember_state, remember_with_key};
    use crate::scope::{Scope, scoped_effect};
    use crate::signal::signal;
    use crate::{Dispose, effect, key_effect, on_unmount};

    #[test]
    fn signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn signal_subscribe_unsubscribe() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let key = sig.subscribe({
            let seen = seen.clone();
            move |v| seen.borrow_mut().push(*v)
        });
        sig.set(1);
        sig.set(2);
        sig.unsubscribe(key);
        sig.set(3);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn signal_subscriber_reads_reentrantly() {
        let sig = signal(1);
        let seen = Rc::new(Cell::new(0));

        sig.subscribe({
            let sig = sig.clone();
            let seen = seen.clone();
            move |_| seen.set(sig.get())
        });
        sig.set(7);

        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn scope_explicit_dispose() {
        let cleaned = Rc::new(Cell::new(false));

        let scope = Scope::new();
        let flag = cleaned.clone();
        scope.add_disposer(move || flag.set(true));

        assert!(!cleaned.get());
        scope.dispose();
        assert!(cleaned.get());
    }

    #[test]
    fn scope_disposes_children_before_own_disposers() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let parent = Scope::new();
        let child = parent.child();
        let grandchild = child.child();

        for (scope, name) in [(&parent, "parent"), (&child, "child"), (&grandchild, "grandchild")]
        {
            let order = order.clone();
            scope.add_disposer(move || order.borrow_mut().push(name));
        }

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["grandchild", "child", "parent"]);
    }

    #[test]
    fn remember_slot_survives_renders() {
        let mut host = Host::new();

        let first = host.render(|| remember(|| 41));
        let second = host.render(|| remember(|| 99));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*second, 41);
    }

    #[test]
    fn remember_slot_type_change_replaces() {
        let mut host = Host::new();

        let n = host.render(|| *remember(|| 5i32));
        assert_eq!(n, 5);

        // Same slot position, different type: the slot is replaced.
        let s = host.render(|| remember(|| String::from("slot")));
        assert_eq!(*s, "slot");
    }

    #[test]
    fn remember_with_key_is_stable() {
        let mut host = Host::new();

        let (a, b) = host.render(|| {
            let a = remember_with_key("shared", || 42);
            let b = remember_with_key("shared", || 100);
            (a, b)
        });

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(*b, 42);
    }

    #[test]
    fn remember_state_is_mutable() {
        let mut host = Host::new();

        host.render(|| {
            let n = remember_state(|| 0u32);
            *n.borrow_mut() += 1;
        });
        let n = host.render(|| {
            let n = remember_state(|| 0u32);
            *n.borrow()
        });

        assert_eq!(n, 1);
    }

    #[test]
    fn first_call_invokes_behavior_once() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let result = host.render({
            let calls = calls.clone();
            || {
                use_dynamic([5], move |state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                    state.get().unwrap_or(5)
                })
            }
        });

        assert_eq!(*result, 5);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn equal_deps_return_memoized_identity() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, dep: i32| {
            let calls = calls.clone();
            host.render(move || {
                use_dynamic([dep], move |_state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                    dep * 10
                })
            })
        };

        let first = render(&mut host, 5);
        let second = render(&mut host, 5);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn changed_dep_recomputes() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, dep: i32| {
            let calls = calls.clone();
            host.render(move || {
                use_dynamic([dep], move |_state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                    dep * 10
                })
            })
        };

        let first = render(&mut host, 5);
        let second = render(&mut host, 7);

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(*second, 70);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn length_change_recomputes() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, deps: Vec<i32>| {
            let calls = calls.clone();
            host.render(move || {
                use_dynamic(deps, move |_state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                })
            })
        };

        render(&mut host, vec![1]);
        render(&mut host, vec![1]);
        render(&mut host, vec![1, 2]);

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn empty_deps_compute_once() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        for _ in 0..5 {
            let calls = calls.clone();
            host.render(|| {
                use_dynamic_once(move |_state: &StateHandle<()>| {
                    calls.set(calls.get() + 1);
                })
            });
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn state_write_is_invisible_to_its_own_invocation() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, dep: i32| {
            let calls = calls.clone();
            host.render(move || {
                use_dynamic([dep], move |state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                    let seen = state.get();
                    state.set(42);
                    seen
                })
            })
        };

        // Invocation N: the write it makes is not readable within N.
        let first = render(&mut host, 0);
        assert_eq!(*first, None);

        // Unchanged deps: the write scheduled a re-render, but the behavior
        // does not run again and the old result is returned.
        assert!(host.needs_render());
        let second = render(&mut host, 0);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);

        // Next recomputation (gated by a dep change) observes the write.
        let third = render(&mut host, 1);
        assert_eq!(*third, Some(42));
        assert_eq!(calls.get(), 2);
    }

    // The worked example from the crate docs: deps [5] -> [5] -> [7].
    #[test]
    fn dependency_driven_not_state_driven() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, dep: i32| {
            let calls = calls.clone();
            host.render(move || {
                use_dynamic([dep], move |state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                    state.get().unwrap_or(5)
                })
            })
        };

        let first = render(&mut host, 5);
        assert_eq!((*first, calls.get()), (5, 1));

        let second = render(&mut host, 5);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);

        // No set ever happened, so the recomputation still sees "unset".
        let third = render(&mut host, 7);
        assert_eq!((*third, calls.get()), (5, 2));
    }

    #[test]
    fn update_reads_pending_value_and_commit_refreshes_get() {
        let mut host = Host::new();

        let handle = host.render(|| use_dynamic_once(|state: &StateHandle<i32>| state.clone()));

        handle.update(|v| v.copied().unwrap_or(0) + 1);
        handle.update(|v| v.copied().unwrap_or(0) + 1);

        // Not committed yet: the read side still says unset.
        assert_eq!(handle.get(), None);
        assert!(host.needs_render());

        // Any committed render refreshes the read side, even a memoized one.
        host.render(|| use_dynamic_once(|state: &StateHandle<i32>| state.clone()));
        assert_eq!(handle.get(), Some(2));
    }

    #[test]
    fn panic_in_behavior_propagates_and_slot_survives() {
        let mut host = Host::new();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            host.render(|| {
                use_dynamic([1], |_state: &StateHandle<i32>| -> i32 { panic!("behavior failed") })
            })
        }));
        assert!(outcome.is_err());

        let ok = host.render(|| use_dynamic([1], |_state: &StateHandle<i32>| 7i32));
        assert_eq!(*ok, 7);
    }

    #[test]
    #[should_panic(expected = "no active host")]
    fn hooks_outside_render_panic() {
        use_dynamic([1], |_state: &StateHandle<i32>| 0i32);
    }

    #[test]
    fn keyed_hook_is_branch_stable() {
        let mut host = Host::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut render = |host: &mut Host, extra_slot: bool| {
            let calls = calls.clone();
            host.render(move || {
                if extra_slot {
                    let _ = remember(|| 0u8);
                }
                use_dynamic_keyed("hook", [1], move |_state: &StateHandle<i32>| {
                    calls.set(calls.get() + 1);
                })
            })
        };

        let first = render(&mut host, false);
        let second = render(&mut host, true);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn hosts_do_not_share_state() {
        let mut a = Host::new();
        let mut b = Host::new();

        let ha = a.render(|| use_dynamic_once(|state: &StateHandle<i32>| state.clone()));
        let hb = b.render(|| use_dynamic_once(|state: &StateHandle<i32>| state.clone()));

        ha.set(1);
        assert!(a.needs_render());
        assert!(!b.needs_render());

        a.render(|| use_dynamic_once(|state: &StateHandle<i32>| state.clone()));
        assert_eq!(ha.get(), Some(1));
        assert_eq!(hb.get(), None);
    }

    #[test]
    fn nested_host_render_restores_outer_slots() {
        let mut outer = Host::new();
        let mut inner = Host::new();

        let out = outer.render(|| {
            let a = remember(|| 1);
            let b = inner.render(|| remember(|| 2));
            let c = remember(|| 3);
            (*a, *b, *c)
        });

        assert_eq!(out, (1, 2, 3));
    }

    #[test]
    fn unmount_runs_scope_cleanups() {
        let cleaned = Rc::new(Cell::new(false));
        let mut host = Host::new();

        host.render({
            let cleaned = cleaned.clone();
            || {
                scoped_effect(move || Box::new(move || cleaned.set(true)));
            }
        });

        assert!(!cleaned.get());
        host.unmount();
        assert!(cleaned.get());
    }

    #[test]
    fn effect_cleanup_runs_on_unmount() {
        let cleaned = Rc::new(Cell::new(false));
        let mut host = Host::new();

        host.render({
            let cleaned = cleaned.clone();
            || {
                effect(move || on_unmount(move || cleaned.set(true)));
            }
        });

        assert!(!cleaned.get());
        host.unmount();
        assert!(cleaned.get());
    }

    #[test]
    fn effect_early_disposal_is_idempotent() {
        let cleanups = Rc::new(Cell::new(0u32));
        let mut host = Host::new();

        let dispose = host.render({
            let cleanups = cleanups.clone();
            || effect(move || on_unmount(move || cleanups.set(cleanups.get() + 1)))
        });

        // Manual early disposal; the scope disposer must not run it again.
        dispose.run();
        assert_eq!(cleanups.get(), 1);

        host.unmount();
        assert_eq!(cleanups.get(), 1);
    }

    #[test]
    fn key_effect_tracks_key_changes() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new();

        let mut render = |host: &mut Host, key: u32| {
            let log = log.clone();
            host.render(move || {
                key_effect(key, move || {
                    log.borrow_mut().push(format!("start {key}"));
                    let log = log.clone();
                    Dispose::new(move || log.borrow_mut().push(format!("stop {key}")))
                })
            })
        };

        render(&mut host, 1);
        render(&mut host, 1);
        render(&mut host, 2);
        host.unmount();

        assert_eq!(
            *log.borrow(),
            vec!["start 1", "stop 1", "start 2", "stop 2"]
        );
    }

    #[test]
    fn memo_cell_staleness_policy() {
        let memo: MemoCell<[i32; 2], &str> = MemoCell::new();

        assert!(memo.lookup(&[1, 2]).is_none());
        memo.store([1, 2], Rc::new("a"));
        assert_eq!(*memo.lookup(&[1, 2]).unwrap(), "a");
        assert!(memo.lookup(&[1, 3]).is_none());
    }
}
