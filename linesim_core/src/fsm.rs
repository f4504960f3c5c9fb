//! Generic finite-state-machine engine.
//!
//! A [`Manager`] owns exactly one active [`ControlState`]. States never hold a
//! reference back to the manager; instead `handle` returns a [`Step`] that may
//! carry the next state, and the manager performs the transition once the
//! state has finished handling the input.
//!
//! Transition order for [`Manager::set_state`] is fixed:
//!
//! 1. `exit` on the outgoing state
//! 2. every state-change callback, in registration order, with
//!    `(old, new, last_input)`
//! 3. the new state replaces the old one
//! 4. `enter` on the new state

/// Behaviour every concrete state must provide.
///
/// There are no default method bodies: a state type opts in to each hook
/// explicitly, and the trait itself cannot be instantiated.
pub trait ControlState: Sized {
    type Input;
    type Output;

    /// Short identifier used for logging and telemetry.
    fn name(&self) -> &'static str;

    fn enter(&mut self);

    fn handle(&mut self, input: &Self::Input) -> Step<Self, Self::Output>;

    fn exit(&mut self);
}

/// Result of handling one input: the output plus an optional transition.
#[derive(Debug)]
pub struct Step<S, O> {
    pub output: O,
    pub next: Option<S>,
}

impl<S, O> Step<S, O> {
    /// Emit `output` and remain in the current state.
    #[inline]
    pub fn stay(output: O) -> Self {
        Self { output, next: None }
    }

    /// Emit `output` and switch to `next` before the following input.
    #[inline]
    pub fn transition(output: O, next: S) -> Self {
        Self {
            output,
            next: Some(next),
        }
    }
}

type Callback<S> = Box<dyn FnMut(&S, &S, Option<&<S as ControlState>::Input>)>;

pub struct Manager<S: ControlState> {
    state: S,
    callbacks: Vec<Callback<S>>,
    last_input: Option<S::Input>,
}

impl<S: ControlState> core::fmt::Debug for Manager<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Manager")
            .field("state", &self.state.name())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl<S: ControlState> Manager<S> {
    /// Take ownership of `start` and enter it.
    pub fn new(mut start: S) -> Self {
        tracing::debug!(state = start.name(), "entering state");
        start.enter();
        Self {
            state: start,
            callbacks: Vec::new(),
            last_input: None,
        }
    }

    /// Register a callback run on every transition, after `exit` and before `enter`.
    pub fn add_state_change_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&S, &S, Option<&S::Input>) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Store `input` as the last input and forward it to the active state.
    ///
    /// If the state requests a transition it is carried out before returning,
    /// so the next call is handled by the new state.
    pub fn handle(&mut self, input: S::Input) -> S::Output {
        let input = self.last_input.insert(input);
        let Step { output, next } = self.state.handle(input);
        if let Some(next) = next {
            self.set_state(next);
        }
        output
    }

    /// Replace the active state. See the module docs for the exact order.
    pub fn set_state(&mut self, new_state: S) {
        tracing::debug!(state = self.state.name(), "exiting state");
        self.state.exit();
        tracing::info!(
            from = self.state.name(),
            to = new_state.name(),
            "state transition"
        );
        for cb in &mut self.callbacks {
            cb(&self.state, &new_state, self.last_input.as_ref());
        }
        self.state = new_state;
        tracing::debug!(state = self.state.name(), "entering state");
        self.state.enter();
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn last_input(&self) -> Option<&S::Input> {
        self.last_input.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    enum Light {
        Green(Log),
        Red(Log),
    }

    impl Light {
        fn log(&self) -> &Log {
            match self {
                Light::Green(l) | Light::Red(l) => l,
            }
        }
    }

    impl ControlState for Light {
        type Input = u32;
        type Output = &'static str;

        fn name(&self) -> &'static str {
            match self {
                Light::Green(_) => "green",
                Light::Red(_) => "red",
            }
        }

        fn enter(&mut self) {
            let msg = format!("enter {}", self.name());
            self.log().borrow_mut().push(msg);
        }

        fn handle(&mut self, input: &u32) -> Step<Self, &'static str> {
            let name = self.name();
            self.log().borrow_mut().push(format!("handle {name} {input}"));
            if *input > 3 {
                let log = self.log().clone();
                let next = match self {
                    Light::Green(_) => Light::Red(log),
                    Light::Red(_) => Light::Green(log),
                };
                return Step::transition(name, next);
            }
            Step::stay(name)
        }

        fn exit(&mut self) {
            let msg = format!("exit {}", self.name());
            self.log().borrow_mut().push(msg);
        }
    }

    #[test]
    fn new_enters_start_state_once() {
        let log: Log = Rc::default();
        let m = Manager::new(Light::Green(log.clone()));
        assert_eq!(*log.borrow(), vec!["enter green"]);
        assert_eq!(m.state().name(), "green");
        assert!(m.last_input().is_none());
    }

    #[test]
    fn set_state_runs_exit_callbacks_then_enter() {
        let log: Log = Rc::default();
        let mut m = Manager::new(Light::Green(log.clone()));
        for tag in ["a", "b"] {
            let cb_log = log.clone();
            m.add_state_change_callback(move |old, new, input| {
                cb_log.borrow_mut().push(format!(
                    "cb{tag} {}->{} {:?}",
                    old.name(),
                    new.name(),
                    input
                ));
            });
        }
        m.handle(1);
        m.set_state(Light::Red(log.clone()));
        assert_eq!(
            *log.borrow(),
            vec![
                "enter green",
                "handle green 1",
                "exit green",
                "cba green->red Some(1)",
                "cbb green->red Some(1)",
                "enter red",
            ]
        );
        assert_eq!(m.state().name(), "red");
    }

    #[test]
    fn handle_returns_output_of_old_state_and_switches() {
        let log: Log = Rc::default();
        let mut m = Manager::new(Light::Green(log.clone()));
        assert_eq!(m.handle(1), "green");
        assert_eq!(m.handle(9), "green");
        assert_eq!(m.state().name(), "red");
        assert_eq!(m.handle(2), "red");
        assert_eq!(m.last_input(), Some(&2));
        assert_eq!(
            *log.borrow(),
            vec![
                "enter green",
                "handle green 1",
                "handle green 9",
                "exit green",
                "enter red",
                "handle red 2",
            ]
        );
    }

    #[test]
    fn callbacks_see_triggering_input() {
        let log: Log = Rc::default();
        let seen: Rc<RefCell<Vec<u32>>> = Rc::default();
        let mut m = Manager::new(Light::Green(log));
        let s = seen.clone();
        m.add_state_change_callback(move |_, _, input| {
            s.borrow_mut().extend(input.copied());
        });
        m.handle(5);
        m.handle(7);
        assert_eq!(*seen.borrow(), vec![5, 7]);
    }
}
