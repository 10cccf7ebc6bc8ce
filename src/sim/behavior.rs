//! Composable time-sliced behaviors
//!
//! Every behavior follows the same contract: `update(subject, dt)` returns the
//! *leftover* time. A positive leftover means the behavior finished during this
//! frame with time to spare; zero means it is still running.

use glam::Vec2;

use super::actor::Actor;

/// An atomic time-consuming action
pub trait Action<S> {
    fn update(&mut self, subject: &mut S, dt: f32) -> f32;
}

impl<S, F> Action<S> for F
where
    F: FnMut(&mut S, f32) -> f32,
{
    fn update(&mut self, subject: &mut S, dt: f32) -> f32 {
        self(subject, dt)
    }
}

/// A behavior tree node
pub enum Behavior<S> {
    Action(Box<dyn Action<S>>),
    IfElse(Box<IfElse<S>>),
    Sequence(Box<Sequence<S>>),
}

impl<S> Behavior<S> {
    pub fn action(action: impl Action<S> + 'static) -> Self {
        Behavior::Action(Box::new(action))
    }

    pub fn if_else(
        condition: impl FnMut(&S) -> bool + 'static,
        consequent: Behavior<S>,
        alternative: Behavior<S>,
    ) -> Self {
        Behavior::IfElse(Box::new(IfElse::new(condition, consequent, alternative)))
    }

    pub fn sequence(children: Vec<Behavior<S>>) -> Self {
        Behavior::Sequence(Box::new(Sequence::new(children)))
    }

    /// Run for `dt` seconds and return the leftover.
    ///
    /// A leftover that is negative, NaN or larger than `dt` is treated as
    /// "still running" and reported as zero.
    pub fn update(&mut self, subject: &mut S, dt: f32) -> f32 {
        let leftover = match self {
            Behavior::Action(action) => action.update(subject, dt),
            Behavior::IfElse(node) => node.update(subject, dt),
            Behavior::Sequence(node) => node.update(subject, dt),
        };
        clamp_leftover(leftover, dt)
    }
}

fn clamp_leftover(leftover: f32, dt: f32) -> f32 {
    if leftover >= 0.0 && leftover <= dt {
        leftover
    } else {
        log::debug!("behavior returned out-of-range leftover {leftover} for dt {dt}");
        0.0
    }
}

/// Condition-gated dispatch between two branches.
///
/// The condition is evaluated once when the node activates; the selected branch
/// then keeps running across frames until it reports leftover time, at which
/// point the node goes idle again.
pub struct IfElse<S> {
    condition: Box<dyn FnMut(&S) -> bool>,
    consequent: Behavior<S>,
    alternative: Behavior<S>,
    evaluated: bool,
    evaluation: bool,
}

impl<S> IfElse<S> {
    pub fn new(
        condition: impl FnMut(&S) -> bool + 'static,
        consequent: Behavior<S>,
        alternative: Behavior<S>,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            consequent,
            alternative,
            evaluated: false,
            evaluation: false,
        }
    }

    pub fn update(&mut self, subject: &mut S, dt: f32) -> f32 {
        if !self.evaluated {
            self.evaluation = (self.condition)(&*subject);
            self.evaluated = true;
        }

        let branch = if self.evaluation {
            &mut self.consequent
        } else {
            &mut self.alternative
        };
        let leftover = branch.update(subject, dt);

        if leftover > 0.0 {
            self.reset();
        }
        leftover
    }

    /// Return to idle so the next update re-evaluates the condition
    pub fn reset(&mut self) {
        self.evaluated = false;
    }

    /// True while a branch is selected and running
    pub fn is_active(&self) -> bool {
        self.evaluated
    }
}

/// Runs children one after another, forwarding leftover time
pub struct Sequence<S> {
    children: Vec<Behavior<S>>,
    current: usize,
}

impl<S> Sequence<S> {
    pub fn new(children: Vec<Behavior<S>>) -> Self {
        Self {
            children,
            current: 0,
        }
    }

    pub fn update(&mut self, subject: &mut S, dt: f32) -> f32 {
        if self.children.is_empty() {
            return dt;
        }

        let mut remaining = dt;
        loop {
            let leftover = self.children[self.current].update(subject, remaining);
            if leftover <= 0.0 {
                return 0.0;
            }
            remaining = leftover;
            self.current += 1;
            if self.current == self.children.len() {
                self.current = 0;
                return remaining;
            }
        }
    }
}

/// Consumes `duration` seconds and does nothing else
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f32,
    elapsed: f32,
}

pub fn wait(duration: f32) -> Wait {
    Wait {
        duration,
        elapsed: 0.0,
    }
}

impl<S> Action<S> for Wait {
    fn update(&mut self, _subject: &mut S, dt: f32) -> f32 {
        self.elapsed += dt;
        if self.elapsed > self.duration {
            let leftover = (self.elapsed - self.duration).min(dt);
            self.elapsed = 0.0;
            leftover
        } else {
            0.0
        }
    }
}

/// Holds an actor's velocity for `duration` seconds, then stops it
#[derive(Debug, Clone)]
pub struct MoveFor {
    velocity: Vec2,
    duration: f32,
    elapsed: f32,
}

pub fn move_for(velocity: Vec2, duration: f32) -> MoveFor {
    MoveFor {
        velocity,
        duration,
        elapsed: 0.0,
    }
}

impl Action<Actor> for MoveFor {
    fn update(&mut self, actor: &mut Actor, dt: f32) -> f32 {
        self.elapsed += dt;
        if self.elapsed > self.duration {
            let leftover = (self.elapsed - self.duration).min(dt);
            self.elapsed = 0.0;
            actor.velocity = Vec2::ZERO;
            leftover
        } else {
            actor.velocity = self.velocity;
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 0.016;

    /// Action that stays busy for `busy_calls` updates, then returns all of dt
    fn busy_then_done(busy_calls: u32) -> impl FnMut(&mut u32, f32) -> f32 {
        let mut calls = 0;
        move |_subject: &mut u32, dt: f32| {
            calls += 1;
            if calls > busy_calls {
                calls = 0;
                dt
            } else {
                0.0
            }
        }
    }

    fn counting_condition(counter: Rc<Cell<u32>>, result: bool) -> impl FnMut(&u32) -> bool {
        move |_subject: &u32| {
            counter.set(counter.get() + 1);
            result
        }
    }

    #[test]
    fn test_condition_evaluated_once_per_activation() {
        let evaluations = Rc::new(Cell::new(0));
        let mut node = IfElse::new(
            counting_condition(evaluations.clone(), true),
            Behavior::action(busy_then_done(5)),
            Behavior::action(|_: &mut u32, _: f32| 0.0),
        );

        let mut subject = 0u32;
        let mut finished = false;
        for _ in 0..6 {
            finished = node.update(&mut subject, DT) > 0.0;
        }
        assert!(finished);
        assert_eq!(evaluations.get(), 1);
    }

    #[test]
    fn test_reset_after_completion_reevaluates() {
        let flag = Rc::new(Cell::new(true));
        let seen = flag.clone();
        let mut node = IfElse::new(
            move |_: &u32| seen.get(),
            Behavior::action(|s: &mut u32, dt: f32| {
                *s += 1;
                dt
            }),
            Behavior::action(|s: &mut u32, dt: f32| {
                *s += 100;
                dt
            }),
        );

        let mut subject = 0u32;
        assert!(node.update(&mut subject, DT) > 0.0);
        assert!(!node.is_active());

        flag.set(false);
        node.update(&mut subject, DT);
        assert_eq!(subject, 101);
    }

    #[test]
    fn test_multi_frame_activation_scenario() {
        let evaluations = Rc::new(Cell::new(0));
        let mut node = IfElse::new(
            counting_condition(evaluations.clone(), true),
            Behavior::action(busy_then_done(3)),
            Behavior::action(|_: &mut u32, _: f32| 0.0),
        );
        let mut subject = 0u32;

        for _ in 0..3 {
            assert_eq!(node.update(&mut subject, DT), 0.0);
            assert!(node.is_active());
        }
        assert_eq!(node.update(&mut subject, DT), DT);
        assert!(!node.is_active());
        assert_eq!(evaluations.get(), 1);

        node.update(&mut subject, DT);
        assert_eq!(evaluations.get(), 2);
    }

    #[test]
    fn test_out_of_range_leftover_is_still_running() {
        let mut node = IfElse::new(
            |_: &u32| true,
            Behavior::action(|_: &mut u32, dt: f32| dt * 2.0),
            Behavior::action(|_: &mut u32, _: f32| 0.0),
        );
        let mut subject = 0u32;
        assert_eq!(node.update(&mut subject, DT), 0.0);
        assert!(node.is_active());

        let mut negative = Behavior::action(|_: &mut u32, _: f32| -1.0);
        assert_eq!(negative.update(&mut subject, DT), 0.0);
        let mut nan = Behavior::action(|_: &mut u32, _: f32| f32::NAN);
        assert_eq!(nan.update(&mut subject, DT), 0.0);
    }

    #[test]
    fn test_nested_if_else() {
        let outer_evals = Rc::new(Cell::new(0));
        let inner_evals = Rc::new(Cell::new(0));
        let inner = Behavior::if_else(
            counting_condition(inner_evals.clone(), false),
            Behavior::action(|_: &mut u32, _: f32| 0.0),
            Behavior::action(busy_then_done(1)),
        );
        let mut outer = IfElse::new(
            counting_condition(outer_evals.clone(), true),
            inner,
            Behavior::action(|_: &mut u32, _: f32| 0.0),
        );

        let mut subject = 0u32;
        assert_eq!(outer.update(&mut subject, DT), 0.0);
        assert_eq!(outer.update(&mut subject, DT), DT);
        assert_eq!(outer_evals.get(), 1);
        assert_eq!(inner_evals.get(), 1);
        assert!(!outer.is_active());
    }

    #[test]
    fn test_sequence_forwards_leftover() {
        let mut seq = Behavior::sequence(vec![
            Behavior::action(wait(0.01)),
            Behavior::action(wait(0.02)),
        ]);
        let mut subject = 0u32;
        // 0.016 covers the first wait with 0.006 to spare, which goes to the second
        assert_eq!(seq.update(&mut subject, DT), 0.0);
        let leftover = seq.update(&mut subject, DT);
        assert!((leftover - 0.002).abs() < 1e-5);
    }

    #[test]
    fn test_wait_completes_after_duration() {
        let mut w = wait(0.05);
        let mut subject = ();
        let mut frames = 0;
        loop {
            frames += 1;
            if Action::<()>::update(&mut w, &mut subject, DT) > 0.0 {
                break;
            }
        }
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_move_for_drives_velocity_then_stops() {
        let mut actor = Actor::centered(Vec2::ZERO, 2.0);
        let mut mover = move_for(Vec2::new(50.0, 0.0), 0.02);
        assert_eq!(mover.update(&mut actor, DT), 0.0);
        assert_eq!(actor.velocity, Vec2::new(50.0, 0.0));
        assert!(mover.update(&mut actor, DT) > 0.0);
        assert_eq!(actor.velocity, Vec2::ZERO);
    }
}
